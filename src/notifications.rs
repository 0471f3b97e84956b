//! Transient notification banners
//!
//! Banners expire after a fixed delay. Expiry is checked when drawing, and
//! egui is asked to repaint when the next banner is due to disappear.

use eframe::egui::{self, RichText};
use std::time::{Duration, Instant};

/// Default banner lifetime
pub const DEFAULT_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Info => "ℹ",
            NotificationKind::Success => "✓",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Queue of visible banners, oldest first
#[derive(Debug, Clone)]
pub struct Notifications {
    items: Vec<Notification>,
    duration: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            duration,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    fn push_at(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match kind {
            NotificationKind::Error => log::error!("{}", message),
            NotificationKind::Warning => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }
        self.items.push(Notification {
            kind,
            message,
            expires_at: now + self.duration,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message);
    }

    /// Drop expired banners
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    pub fn visible(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Time until the next banner expires
    pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
        self.items
            .iter()
            .map(|n| n.expires_at.saturating_duration_since(now))
            .min()
    }

    /// Draw banners in the top-right corner
    pub fn show(&mut self, ctx: &egui::Context, theme: &crate::theme::Theme) {
        let now = Instant::now();
        self.prune(now);
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                for notification in &self.items {
                    let color = match notification.kind {
                        NotificationKind::Info => theme.accent,
                        NotificationKind::Success => theme.success,
                        NotificationKind::Warning => theme.warning,
                        NotificationKind::Error => theme.error,
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, color))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(format!(
                                    "{} {}",
                                    notification.kind.icon(),
                                    notification.message
                                ))
                                .color(color),
                            );
                        });
                    ui.add_space(4.0);
                }
            });

        if let Some(wait) = self.next_expiry(now) {
            ctx.request_repaint_after(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banners_expire_after_duration() {
        let start = Instant::now();
        let mut queue = Notifications::new(Duration::from_secs(3));
        queue.push_at(NotificationKind::Info, "first", start);
        queue.push_at(NotificationKind::Warning, "second", start + Duration::from_secs(1));

        queue.prune(start + Duration::from_secs(2));
        assert_eq!(queue.visible().len(), 2);
        assert_eq!(
            queue.next_expiry(start + Duration::from_secs(2)),
            Some(Duration::from_secs(1))
        );

        queue.prune(start + Duration::from_secs(3));
        assert_eq!(queue.visible().len(), 1);
        assert_eq!(queue.visible()[0].message, "second");

        queue.prune(start + Duration::from_secs(4));
        assert!(queue.is_empty());
        assert_eq!(queue.next_expiry(start), None);
    }
}
