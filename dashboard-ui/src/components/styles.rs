pub const DASHBOARD_STYLES: &str = r#"
/* Layout */
.dashboard {
    display: flex;
    flex-direction: column;
    gap: 1rem;
    padding: 1rem;
    min-height: 100vh;
    background: var(--dashboard-bg, #f4f6f9);
    color: var(--text-primary, #212529);
}

.dashboard-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
}

.dashboard-title {
    margin: 0;
    font-size: 1.5rem;
    font-weight: 600;
}

.dashboard-tools {
    display: flex;
    align-items: center;
    gap: 0.75rem;
}

.dashboard-grid {
    display: grid;
    grid-template-columns: minmax(0, 1fr) minmax(0, 1fr);
    gap: 1rem;
}

.dashboard-column {
    display: flex;
    flex-direction: column;
    gap: 1rem;
    min-width: 0;
}

@media (max-width: 992px) {
    .dashboard-grid {
        grid-template-columns: minmax(0, 1fr);
    }
}

/* Panels */
.panel {
    position: relative;
    background: var(--panel-bg, #ffffff);
    border: 1px solid var(--border-color, #dee2e6);
    border-radius: 0.375rem;
    overflow: hidden;
}

.panel-header {
    display: flex;
    align-items: center;
    gap: 0.5rem;
    padding: 0.5rem 0.75rem;
    border-bottom: 1px solid var(--border-color, #dee2e6);
    background: var(--panel-header-bg, #f8f9fa);
}

.panel-header h2 {
    flex: 1;
    margin: 0;
    font-size: 1rem;
    font-weight: 600;
}

.panel-body {
    padding: 0.75rem;
    max-height: 24rem;
    overflow-y: auto;
}

.panel-empty {
    margin: 0;
    color: var(--text-muted, #6c757d);
    font-style: italic;
    text-align: center;
}

.panel-loader {
    position: absolute;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(255, 255, 255, 0.8);
    z-index: 2;
}

/* Tables */
.panel table {
    width: 100%;
    border-collapse: collapse;
    font-size: 0.875rem;
}

.panel th,
.panel td {
    padding: 0.25rem 0.5rem;
    border-bottom: 1px solid var(--border-color, #dee2e6);
    text-align: left;
    vertical-align: middle;
}

.info-table th {
    width: 40%;
    font-weight: 500;
}

.info-row.dimmed {
    opacity: 0.4;
}

.countdowns {
    margin-top: 0.75rem;
}

.timer {
    font-family: monospace;
}

.timer-ready {
    color: var(--success, #28a745);
    font-weight: 600;
}

.artifact-image {
    width: 1.5rem;
    height: 1.5rem;
    margin-right: 0.25rem;
    vertical-align: middle;
}

/* Controls */
.instance-controls,
.queue-controls {
    display: flex;
    flex-wrap: wrap;
    align-items: center;
    gap: 0.75rem;
    margin-bottom: 0.75rem;
}

.queue-controls {
    padding: 0.75rem 0.75rem 0;
}

.choice,
.theme-select {
    display: flex;
    align-items: center;
    gap: 0.25rem;
    font-size: 0.875rem;
}

.instance-actions {
    display: flex;
    gap: 0.5rem;
    margin-left: auto;
}

.action-button,
.icon-button {
    background: none;
    border: none;
    padding: 0.25rem;
    cursor: pointer;
}

.action-button:disabled,
.icon-button:disabled {
    cursor: not-allowed;
}

.instance-state {
    font-size: 0.75rem;
    text-transform: uppercase;
    color: var(--text-muted, #6c757d);
}

.text-success { color: var(--success, #28a745); }
.text-warning { color: var(--warning, #ffc107); }
.text-danger { color: var(--danger, #dc3545); }
.text-muted { color: var(--text-muted, #6c757d); }
.text-light { color: var(--light, #ced4da); }
.text-dark { color: var(--dark, #343a40); }

/* Feeds */
.channel-badge {
    font-size: 0.7rem;
    padding: 0.1rem 0.4rem;
    border-radius: 0.75rem;
    text-transform: uppercase;
}

.channel-badge.connected {
    background: rgba(40, 167, 69, 0.15);
    color: var(--success, #28a745);
}

.channel-badge.disconnected {
    background: rgba(220, 53, 69, 0.15);
    color: var(--danger, #dc3545);
}

.log-body {
    display: flex;
    flex-direction: column;
    gap: 0.125rem;
    background: var(--log-bg, #1e1e1e);
}

.log-record {
    color: var(--log-text, #d4d4d4);
    white-space: pre-wrap;
    word-break: break-word;
}

.prestige-summary {
    display: grid;
    grid-template-columns: repeat(4, minmax(0, 1fr));
    gap: 0.5rem;
    padding: 0.75rem 0.75rem 0;
}

.summary-card {
    display: flex;
    flex-direction: column;
    padding: 0.5rem;
    border: 1px solid var(--border-color, #dee2e6);
    border-radius: 0.25rem;
}

.summary-label {
    font-size: 0.7rem;
    text-transform: uppercase;
    color: var(--text-muted, #6c757d);
}

.summary-value {
    font-weight: 600;
}

/* Game screen */
.game-screen-body {
    display: flex;
    justify-content: center;
}

.game-screen-image {
    max-width: 100%;
    border-radius: 0.25rem;
}

/* Alerts */
.alert-stack {
    position: fixed;
    top: 1rem;
    right: 1rem;
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
    z-index: 1050;
    max-width: 28rem;
}

.alert {
    padding: 0.75rem 1rem;
    border-radius: 0.375rem;
    border: 1px solid transparent;
    cursor: pointer;
    box-shadow: 0 0.25rem 0.75rem rgba(0, 0, 0, 0.1);
}

.alert-success { background: #d4edda; color: #155724; border-color: #c3e6cb; }
.alert-info { background: #d1ecf1; color: #0c5460; border-color: #bee5eb; }
.alert-warning { background: #fff3cd; color: #856404; border-color: #ffeeba; }
.alert-danger { background: #f8d7da; color: #721c24; border-color: #f5c6cb; }

/* Modals and overlays */
.modal-backdrop {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.5);
    z-index: 1040;
}

.modal {
    width: min(40rem, 90vw);
    max-height: 80vh;
    display: flex;
    flex-direction: column;
    background: var(--panel-bg, #ffffff);
    border-radius: 0.375rem;
    overflow: hidden;
}

.modal-header,
.modal-footer {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 0.75rem 1rem;
}

.modal-title {
    margin: 0;
}

.modal-body {
    padding: 1rem;
    overflow-y: auto;
}

.away-overlay {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.85);
    color: #ffffff;
    z-index: 1060;
    backdrop-filter: blur(1px);
}

.away-time {
    font-family: monospace;
    font-size: 4rem;
}
"#;
