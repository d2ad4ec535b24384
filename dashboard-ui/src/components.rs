mod alert_stack;
mod away;
mod feeds;
mod game_screen;
mod instance_panel;
mod instances;
mod release;
mod styles;
mod tools;

pub use alert_stack::AlertStack;
pub use away::AwayOverlay;
pub use feeds::{LogPanel, PrestigePanel, QueuePanel};
pub use game_screen::GameScreen;
pub use instance_panel::{InstancePanel, TimerText};
pub use instances::InstancesTable;
pub use release::ReleaseModal;
pub use styles::DASHBOARD_STYLES;
pub use tools::{KillInstanceButton, ThemeSelect};
