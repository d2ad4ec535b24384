use std::collections::HashMap;

use dioxus::prelude::*;
use shared_types::{DashboardBootstrap, PushMessage, PushTopic};

use crate::feeds::{LogFeed, PrestigeFeed, QueueFeed};
use crate::instance::{Field, FieldValue, InstanceView, TimerKey, TimerTargets, ViewSink};
use crate::selection::{InstanceRows, SelectionWatch};
use crate::timers::{TimerFrame, TimerTarget};

/// Connection flag per push topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStatus {
    instance: bool,
    log: bool,
    prestige: bool,
    queued: bool,
}

impl ChannelStatus {
    fn slot(&mut self, topic: PushTopic) -> &mut bool {
        match topic {
            PushTopic::Instance => &mut self.instance,
            PushTopic::Log => &mut self.log,
            PushTopic::Prestige => &mut self.prestige,
            PushTopic::Queued => &mut self.queued,
        }
    }

    pub fn set(&mut self, topic: PushTopic, connected: bool) {
        *self.slot(topic) = connected;
    }

    pub fn is_connected(&self, topic: PushTopic) -> bool {
        match topic {
            PushTopic::Instance => self.instance,
            PushTopic::Log => self.log,
            PushTopic::Prestige => self.prestige,
            PushTopic::Queued => self.queued,
        }
    }
}

/// Shared dashboard state, provided as context by the shell.
#[derive(Clone, Copy)]
pub struct DashboardState {
    pub bootstrap: Signal<DashboardBootstrap>,
    pub rows: Signal<InstanceRows>,
    pub view: Signal<InstanceView>,
    pub log: Signal<LogFeed>,
    pub prestiges: Signal<PrestigeFeed>,
    pub queue: Signal<QueueFeed>,
    pub channels: Signal<ChannelStatus>,
    /// Configuration picked for the next PLAY.
    pub configuration_choice: Signal<Option<String>>,
    /// Window picked for the next PLAY.
    pub window_choice: Signal<Option<String>>,
}

impl DashboardState {
    /// Must be called from a component hook.
    pub fn new(bootstrap: DashboardBootstrap) -> Self {
        let rows = InstanceRows::new(bootstrap.instances.clone(), bootstrap.active);
        let configuration_choice = bootstrap.configurations.first().map(|c| c.value.clone());
        let window_choice = bootstrap.windows.first().map(|w| w.value.clone());
        Self {
            bootstrap: Signal::new(bootstrap),
            rows: Signal::new(rows),
            view: Signal::new(InstanceView::new()),
            log: Signal::new(LogFeed::default()),
            prestiges: Signal::new(PrestigeFeed::default()),
            queue: Signal::new(QueueFeed::default()),
            channels: Signal::new(ChannelStatus::default()),
            configuration_choice: Signal::new(configuration_choice),
            window_choice: Signal::new(window_choice),
        }
    }

    pub fn field(&self, field: Field) -> Option<FieldValue> {
        self.view.read().get(&field).cloned()
    }
}

/// Everything the dashboard shows for the active instance.
pub trait InstanceScope: ViewSink {
    /// Forget the view and every feed of the previous instance.
    fn clear(&mut self);
    /// Empty the prestige summary and queue of an instance that stopped.
    fn clear_idle_feeds(&mut self);
}

impl ViewSink for Signal<InstanceView> {
    fn write_field(&mut self, field: Field, value: FieldValue) {
        self.write().insert(field, value);
    }
}

impl ViewSink for DashboardState {
    fn write_field(&mut self, field: Field, value: FieldValue) {
        self.view.write_field(field, value);
    }
}

impl InstanceScope for DashboardState {
    fn clear(&mut self) {
        self.view.write().clear();
        self.log.write().clear();
        self.clear_idle_feeds();
    }

    fn clear_idle_feeds(&mut self) {
        self.prestiges.write().reset();
        self.queue.write().clear();
    }
}

/// One signal per timer slot, so a ticking stopwatch only re-renders its own text.
#[derive(Clone)]
pub struct TimerFrames {
    frames: HashMap<TimerKey, Signal<TimerFrame>>,
}

impl TimerFrames {
    /// Must be called from a component hook.
    pub fn new() -> Self {
        Self {
            frames: TimerKey::all()
                .map(|key| (key, Signal::new(TimerFrame::Blank)))
                .collect(),
        }
    }

    pub fn get(&self, key: TimerKey) -> Option<Signal<TimerFrame>> {
        self.frames.get(&key).copied()
    }

    /// Wipe every slot, used when the panel switches instance.
    pub fn blank_all(&self) {
        for mut frame in self.frames.values().copied() {
            if *frame.peek() != TimerFrame::Blank {
                frame.set(TimerFrame::Blank);
            }
        }
    }
}

/// Renders a timer into a signal, skipping writes that would not change it.
pub struct FrameTarget {
    frame: Signal<TimerFrame>,
}

impl FrameTarget {
    pub fn new(frame: Signal<TimerFrame>) -> Self {
        Self { frame }
    }
}

impl TimerTarget for FrameTarget {
    fn render(&mut self, frame: TimerFrame) {
        if *self.frame.peek() != frame {
            self.frame.set(frame);
        }
    }
}

struct Discard;

impl TimerTarget for Discard {
    fn render(&mut self, _frame: TimerFrame) {}
}

impl TimerTargets<TimerKey> for TimerFrames {
    fn target_for(&self, key: TimerKey) -> Box<dyn TimerTarget> {
        match self.get(key) {
            Some(frame) => Box::new(FrameTarget::new(frame)),
            None => Box::new(Discard),
        }
    }
}

/// Drop pushes for anything but the instance the watch last saw.
pub fn accept_push(watch: &SelectionWatch, message: PushMessage) -> Option<PushMessage> {
    if watch.accepts(message.instance_id()) {
        Some(message)
    } else {
        dioxus_logger::tracing::debug!(
            "Ignoring push for inactive instance {}",
            message.instance_id()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use shared_types::{InstanceId, LogRecord};

    use super::*;

    fn log_push(id: i64) -> PushMessage {
        PushMessage::Log {
            instance_id: InstanceId(id),
            record: LogRecord {
                message: "tick".to_string(),
            },
        }
    }

    #[test]
    fn pushes_for_other_instances_are_dropped() {
        let mut watch = SelectionWatch::default();
        assert!(accept_push(&watch, log_push(1)).is_none());

        watch.poll(Some(InstanceId(1)));
        assert!(accept_push(&watch, log_push(1)).is_some());
        assert!(accept_push(&watch, log_push(2)).is_none());
    }

    #[test]
    fn pushes_inside_the_poll_window_are_dropped() {
        let mut watch = SelectionWatch::default();
        watch.poll(Some(InstanceId(1)));
        // Selection moved to 2 but the watch has not polled yet.
        assert!(accept_push(&watch, log_push(2)).is_none());
        watch.poll(Some(InstanceId(2)));
        assert!(accept_push(&watch, log_push(2)).is_some());
    }

    #[test]
    fn channel_status_tracks_each_topic() {
        let mut status = ChannelStatus::default();
        status.set(PushTopic::Prestige, true);
        assert!(status.is_connected(PushTopic::Prestige));
        assert!(!status.is_connected(PushTopic::Log));
        status.set(PushTopic::Prestige, false);
        assert!(!status.is_connected(PushTopic::Prestige));
    }
}
