//! Path Viewer Demo
//!
//! Run with: cargo run --example path_viewer_demo
//!
//! Feeds a scripted session through the record relay the way a recorder
//! would, then opens the interactive path view:
//! - Table cell runs collapse into grouped nodes
//! - Pan/zoom, hover tooltips, selection details
//! - Curved (serpentine) layout toggle

use action_path::path::{PathTheme, PathView, PathViewer};
use action_path::records::{ActionRecord, ActionType, ElementInfo, LocalStore, RecordRelay, TableInfo};
use action_path::theme::Theme;
use action_path::ViewerConfig;
use chrono::{Duration, Utc};
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Path Viewer Demo - action-path"),
        ..Default::default()
    };

    eframe::run_native(
        "Path Viewer Demo",
        options,
        Box::new(|cc| Ok(Box::new(PathViewerApp::new(cc)))),
    )
}

/// A short order-editing session
fn record_session(store: &LocalStore) {
    let start = Utc::now() - Duration::minutes(3);
    let url = "https://shop.example/admin/orders";
    let orders = TableInfo::new("/html/body/main/table[1]")
        .with_caption("Open orders")
        .with_dimensions(6, 30);

    let cell = |row: u32, col: u32, secs: i64| {
        ActionRecord::new(
            ActionType::Click,
            format!("Click order cell row {} column {}", row + 1, col + 1),
            start + Duration::seconds(secs),
            ElementInfo::new("TD").with_table(orders.clone().at_cell(row, col)),
        )
        .with_url(url)
    };
    let field = |action: ActionType, id: &str, desc: &str, secs: i64| {
        ActionRecord::new(
            action,
            desc,
            start + Duration::seconds(secs),
            ElementInfo::new("INPUT")
                .with_id(id)
                .with_paths(format!("//*[@id=\"{}\"]", id), format!("#{}", id)),
        )
        .with_url(url)
    };

    store.start_capture();
    for record in [
        field(ActionType::Input, "search", "Type order number into search", 0).with_value("10423"),
        cell(0, 0, 8),
        cell(0, 3, 12),
        cell(1, 3, 15),
        field(ActionType::Change, "status", "Select status Shipped", 31),
        field(ActionType::Input, "note", "Type a note for the courier", 44),
        cell(2, 1, 60),
        field(ActionType::Submit, "order-form", "Submit order form", 75),
        field(ActionType::Click, "back", "Click Back to list", 90),
    ] {
        store.append(record);
    }
    store.stop_capture();
}

struct PathViewerApp {
    viewer: PathViewer,
    theme: Theme,
}

impl PathViewerApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let store = LocalStore::in_memory();
        record_session(&store);

        let config = ViewerConfig::default();
        let view = PathView::open(
            &store.records(),
            egui::vec2(1200.0, 760.0),
            config.path_settings(),
            PathTheme::from_theme(&theme),
        );

        match view {
            Ok(view) => Self {
                viewer: PathViewer::new(view),
                theme,
            },
            Err(e) => {
                log::error!("Demo session is empty: {}", e);
                std::process::exit(1);
            }
        }
    }
}

impl eframe::App for PathViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Theme", |ui| {
                    if ui.button("Dark (Default)").clicked() {
                        self.theme = Theme::dark();
                        self.theme.apply(ctx);
                        self.viewer.view_mut().set_theme(PathTheme::from_theme(&self.theme));
                        ui.close_menu();
                    }
                    if ui.button("Light").clicked() {
                        self.theme = Theme::light();
                        self.theme.apply(ctx);
                        self.viewer.view_mut().set_theme(PathTheme::from_theme(&self.theme));
                        ui.close_menu();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let view = self.viewer.view();
                    ui.label(format!(
                        "Nodes: {} | Actions: {}",
                        view.nodes().len(),
                        view.nodes().iter().map(|n| n.len()).sum::<usize>()
                    ));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewer.ui(ui);
        });
    }
}
