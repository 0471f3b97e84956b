//! Action Path - recorded action log viewer
//! Built with egui for native Wayland support

use action_path::notifications::Notifications;
use action_path::path::{PathTheme, PathView, PathViewer};
use action_path::records::{
    load_records_from_file, write_export, ActionRecord, LocalStore, RecordRelay, StoreWatcher,
    SubscriptionId,
};
use action_path::{PathError, Theme, ViewerConfig};
use clap::Parser;
use eframe::egui::{self, RichText, Vec2};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "action-path")]
#[command(author, version, about = "View recorded browser actions as a path graph", long_about = None)]
struct Args {
    /// Exported records file to open instead of the local store
    records_file: Option<PathBuf>,

    /// Use the light theme
    #[arg(long)]
    light: bool,

    /// Config file (defaults to ~/.config/action-path/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load_from(path).unwrap_or_else(|e| {
            log::warn!("Failed to load config {}: {}", path.display(), e);
            ViewerConfig::default()
        }),
        None => ViewerConfig::load(),
    };
    if args.light {
        config.theme = "light".to_string();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Action Path"),
        ..Default::default()
    };

    eframe::run_native(
        "Action Path",
        options,
        Box::new(move |cc| Ok(Box::new(ActionPathApp::new(cc, config, args.records_file)))),
    )
}

struct ActionPathApp {
    store: Arc<LocalStore>,
    subscription: SubscriptionId,
    /// Reloads the store when the recorder writes the storage file
    _watcher: Option<StoreWatcher>,
    /// Set by the store subscription, consumed on the next frame
    records_changed: Arc<AtomicBool>,
    records: Vec<ActionRecord>,

    config: ViewerConfig,
    theme: Theme,
    notifications: Notifications,
    viewer: Option<PathViewer>,
}

impl ActionPathApp {
    fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig, file: Option<PathBuf>) -> Self {
        let theme = Theme::from_name(&config.theme);
        theme.apply(&cc.egui_ctx);

        let mut notifications = Notifications::new(config.notification_duration());

        let store = match &file {
            Some(path) => {
                let store = LocalStore::in_memory();
                match load_records_from_file(path) {
                    Ok(records) => {
                        notifications.success(format!(
                            "Loaded {} records from {}",
                            records.len(),
                            path.display()
                        ));
                        store.set_records(records);
                    }
                    Err(e) => notifications.error(format!("Failed to load {}: {}", path.display(), e)),
                }
                store
            }
            None => {
                let path = config.storage_path();
                LocalStore::open(&path).unwrap_or_else(|e| {
                    notifications.error(format!("Failed to open {}: {}", path.display(), e));
                    LocalStore::in_memory()
                })
            }
        };
        let store = Arc::new(store);

        let watcher = match store.path() {
            Some(_) => StoreWatcher::spawn(store.clone())
                .map_err(|e| {
                    notifications.warning(format!("Recorder updates will not show live: {}", e))
                })
                .ok(),
            None => None,
        };

        let records_changed = Arc::new(AtomicBool::new(false));
        let subscription = {
            let flag = records_changed.clone();
            let ctx = cc.egui_ctx.clone();
            store.subscribe(Box::new(move |_records| {
                flag.store(true, Ordering::Release);
                ctx.request_repaint();
            }))
        };

        let records = store.records();
        Self {
            store,
            subscription,
            _watcher: watcher,
            records_changed,
            records,
            config,
            theme,
            notifications,
            viewer: None,
        }
    }

    fn path_theme(&self) -> PathTheme {
        PathTheme::from_theme(&self.theme)
    }

    /// Re-read the store after a change and refresh an open path view
    fn sync_records(&mut self) {
        if !self.records_changed.swap(false, Ordering::Acquire) {
            return;
        }
        self.records = self.store.records();

        if let Some(viewer) = &mut self.viewer {
            match viewer.view_mut().set_records(&self.records) {
                Ok(()) => {}
                Err(PathError::EmptyRecordLog) => {
                    self.viewer = None;
                    self.notifications.info("Record log cleared, path view closed");
                }
                Err(e) => self.notifications.error(e.to_string()),
            }
        }
    }

    fn open_path_view(&mut self, canvas: Vec2) {
        match PathView::open(
            &self.records,
            canvas,
            self.config.path_settings(),
            self.path_theme(),
        ) {
            Ok(view) => self.viewer = Some(PathViewer::new(view)),
            Err(PathError::EmptyRecordLog) => {
                self.notifications.warning("No recorded actions to visualize")
            }
            Err(e) => self.notifications.error(e.to_string()),
        }
    }

    fn toggle_capture(&mut self) {
        if self.store.capture_mode() {
            self.store.stop_capture();
            self.notifications
                .info(format!("Capture stopped: {} actions recorded", self.store.len()));
        } else {
            self.viewer = None;
            self.store.start_capture();
            self.notifications.info("Capture started");
        }
    }

    fn open_records_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Action records", &["json"])
            .pick_file()
        else {
            return;
        };
        match load_records_from_file(&path) {
            Ok(records) => {
                let count = records.len();
                self.store.set_records(records);
                self.notifications
                    .success(format!("Loaded {} records from {}", count, path.display()));
            }
            Err(e) => self
                .notifications
                .error(format!("Failed to load {}: {}", path.display(), e)),
        }
    }

    fn export_records(&mut self) {
        if self.records.is_empty() {
            self.notifications.warning("Nothing to export");
            return;
        }
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match write_export(&dir, &self.records) {
            Ok(path) => self
                .notifications
                .success(format!("Exported to {}", path.display())),
            Err(e) => self.notifications.error(format!("Export failed: {}", e)),
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = if self.theme.is_light() {
            Theme::dark()
        } else {
            Theme::light()
        };
        self.theme.apply(ctx);
        let path_theme = self.path_theme();
        if let Some(viewer) = &mut self.viewer {
            viewer.view_mut().set_theme(path_theme);
        }
    }

    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let capturing = self.store.capture_mode();

                if self.viewer.is_some() {
                    if ui.button("← Records").clicked() {
                        self.viewer = None;
                    }
                } else {
                    let view_button = ui
                        .add_enabled(!capturing, egui::Button::new("🗺 View path"))
                        .on_disabled_hover_text("Stop capture to view the path");
                    if view_button.clicked() {
                        let canvas = ctx.available_rect().size();
                        self.open_path_view(canvas);
                    }
                }

                ui.separator();

                let capture_label = if capturing { "⏹ Stop capture" } else { "⏺ Start capture" };
                if ui.button(capture_label).clicked() {
                    self.toggle_capture();
                }
                if ui.add_enabled(!capturing, egui::Button::new("📂 Open…")).clicked() {
                    self.open_records_file();
                }
                if ui.button("💾 Export…").clicked() {
                    self.export_records();
                }
                if ui.add_enabled(!capturing, egui::Button::new("🗑 Clear")).clicked() {
                    self.store.clear();
                    self.notifications.info("Record log cleared");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if self.theme.is_light() { "🌙" } else { "☀" };
                    if ui.small_button(icon).on_hover_text("Toggle theme").clicked() {
                        self.toggle_theme(ctx);
                    }
                    let status = if capturing {
                        RichText::new(format!("● Capturing · {} actions", self.records.len()))
                            .color(self.theme.error)
                    } else {
                        RichText::new(format!("{} actions", self.records.len()))
                            .color(self.theme.fg_dim)
                    };
                    ui.label(status);
                });
            });
        });
    }

    fn draw_records(&self, ui: &mut egui::Ui) {
        if self.records.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No recorded actions. Start a capture or open an exported file.")
                        .color(self.theme.fg_dim),
                );
            });
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("records_table")
                    .num_columns(5)
                    .spacing([12.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        for header in ["#", "Type", "Description", "Table", "Time"] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        let colors = self.path_theme();
                        for (i, record) in self.records.iter().enumerate() {
                            ui.label((i + 1).to_string());
                            ui.label(
                                RichText::new(record.action.label())
                                    .color(colors.action_color(record.action)),
                            );
                            ui.label(&record.description);
                            ui.label(record.table().map(|t| t.display_name()).unwrap_or("—"));
                            ui.label(
                                record
                                    .timestamp
                                    .with_timezone(&chrono::Local)
                                    .format("%H:%M:%S")
                                    .to_string(),
                            );
                            ui.end_row();
                        }
                    });
            });
    }
}

impl eframe::App for ActionPathApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_records();
        self.draw_top_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.viewer {
            Some(viewer) => viewer.ui(ui),
            None => self.draw_records(ui),
        });

        self.notifications.show(ctx, &self.theme);
    }
}

impl Drop for ActionPathApp {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}
