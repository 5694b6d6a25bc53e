use std::path::{Path, PathBuf};
use std::time::Instant;

use eframe::egui;
use prism_core::{EditorError, EditorSession, Launcher, Prompt};
use prism_project::NodeKind;
use prism_settings::{Localizer, EDITOR_KEYS};
use tracing::warn;

use crate::highlight_job::layout_job;

/// 桌面版對話框：資料夾用原生對話框，檔名由 egui 視窗先收集。
/// Desktop prompt: folders come from the native dialog, text answers are
/// collected by an egui window beforehand and handed over here.
#[derive(Default)]
struct DesktopPrompt {
    entered: Option<String>,
}

impl Prompt for DesktopPrompt {
    fn ask_text(&mut self, _title: &str, _message: &str) -> Option<String> {
        self.entered.take()
    }

    fn pick_folder(&mut self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(title).pick_folder()
    }
}

/// Pending "create file" dialog for one session.
struct NameDialog {
    project: PathBuf,
    name: String,
}

enum SessionAction {
    Toggle(PathBuf),
    Select(PathBuf),
    Open(PathBuf),
    Delete(PathBuf),
    BeginCreate,
    Save,
}

pub struct PrismApp {
    launcher: Launcher,
    prompt: DesktopPrompt,
    selected_project: Option<usize>,
    name_dialog: Option<NameDialog>,
    focused_session: Option<PathBuf>,
    error: Option<String>,
}

impl PrismApp {
    pub fn new(launcher: Launcher) -> Self {
        Self {
            launcher,
            prompt: DesktopPrompt::default(),
            selected_project: None,
            name_dialog: None,
            focused_session: None,
            error: None,
        }
    }

    fn report(&mut self, action: &str, err: impl std::fmt::Display) {
        warn!(action, error = %err, "action failed");
        self.error = Some(format!("{action}: {err}"));
    }

    fn show_launcher(&mut self, ctx: &egui::Context) {
        let localizer = *self.launcher.localizer();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(localizer.text("launcher.app_name"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(localizer.text("launcher.toggle_language")).clicked() {
                        if let Err(err) = self.launcher.toggle_language() {
                            self.report("toggle language", err);
                        }
                    }
                });
            });
            ui.separator();

            let mut open_index = None;
            egui::ScrollArea::vertical()
                .auto_shrink([false, true])
                .max_height((ui.available_height() - 64.0).max(0.0))
                .show(ui, |ui| {
                    for (index, project) in self.launcher.projects().iter().enumerate() {
                        let selected = self.selected_project == Some(index);
                        let response = ui
                            .selectable_label(selected, project.name.as_str())
                            .on_hover_text(project.path.display().to_string());
                        if response.clicked() {
                            self.selected_project = Some(index);
                        }
                        if response.double_clicked() {
                            open_index = Some(index);
                        }
                    }
                });
            if let Some(index) = open_index {
                if let Err(err) = self.launcher.open_project(index) {
                    self.report("open project", err);
                }
            }

            ui.separator();
            if ui.button(localizer.text("launcher.add_project")).clicked() {
                match self.launcher.add_project(&mut self.prompt) {
                    Ok(Some(index)) => self.selected_project = Some(index),
                    Ok(None) => {}
                    Err(err) => self.report("add project", err),
                }
            }
            if let Some(error) = &self.error {
                ui.colored_label(ui.visuals().error_fg_color, error.as_str());
            }
        });
    }

    fn show_sessions(&mut self, ctx: &egui::Context) {
        let localizer = *self.launcher.localizer();
        let paths: Vec<PathBuf> = self.launcher.open_editor_paths().map(Path::to_path_buf).collect();
        let save_shortcut =
            ctx.input_mut(|input| input.consume_key(egui::Modifiers::COMMAND, egui::Key::S));

        for path in paths {
            let mut open = true;
            let mut actions = Vec::new();
            if save_shortcut && self.focused_session.as_deref() == Some(path.as_path()) {
                actions.push(SessionAction::Save);
            }
            let Some(session) = self.launcher.editor_mut(&path) else {
                continue;
            };
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let mut focused = false;
            egui::Window::new(format!("{} [{}]", localizer.text("editor.title"), name))
                .id(egui::Id::new(("session", &path)))
                .open(&mut open)
                .default_size([820.0, 560.0])
                .show(ctx, |ui| {
                    focused = render_session(ui, session, &localizer, &mut actions);
                });
            if focused {
                self.focused_session = Some(path.clone());
            }
            for action in actions {
                self.apply(&path, action);
            }
            if !open {
                self.launcher.close_editor(&path);
                if self.focused_session.as_deref() == Some(path.as_path()) {
                    self.focused_session = None;
                }
            }
        }
    }

    fn apply(&mut self, project: &Path, action: SessionAction) {
        let Some(session) = self.launcher.editor_mut(project) else {
            return;
        };
        let result: Result<(), EditorError> = match action {
            SessionAction::Toggle(dir) => session.tree_mut().toggle(&dir).map(|_| ()).map_err(Into::into),
            SessionAction::Select(node) => session
                .tree_mut()
                .select(Some(node.as_path()))
                .map_err(Into::into),
            SessionAction::Open(file) => session.open_file(&file).map(|_| ()),
            SessionAction::Delete(node) => session.delete(&node).map(|_| ()),
            SessionAction::Save => session.save(Instant::now()).map(|_| ()),
            SessionAction::BeginCreate => {
                self.name_dialog = Some(NameDialog {
                    project: project.to_path_buf(),
                    name: String::new(),
                });
                Ok(())
            }
        };
        if let Err(err) = result {
            self.report("editor", err);
        }
    }

    fn show_name_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.name_dialog.as_mut() else {
            return;
        };
        let localizer = *self.launcher.localizer();
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new(localizer.text("editor.create_file"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(localizer.text("editor.new_file_prompt"));
                let response = ui.text_edit_singleline(&mut dialog.name);
                response.request_focus();
                if response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter)) {
                    confirmed = true;
                }
                ui.horizontal(|ui| {
                    confirmed |= ui.button(localizer.text("dialog.ok")).clicked();
                    cancelled |= ui.button(localizer.text("dialog.cancel")).clicked();
                });
            });
        if !(confirmed || cancelled) {
            return;
        }
        let Some(dialog) = self.name_dialog.take() else {
            return;
        };
        if cancelled {
            return;
        }
        self.prompt.entered = Some(dialog.name);
        let Some(session) = self.launcher.editor_mut(&dialog.project) else {
            return;
        };
        match session.create_file(&mut self.prompt, &localizer) {
            Ok(_) => {}
            Err(err) => self.report("create file", err),
        }
    }
}

/// Draws one session; returns whether its editor has keyboard focus.
fn render_session(
    ui: &mut egui::Ui,
    session: &mut EditorSession,
    localizer: &Localizer,
    actions: &mut Vec<SessionAction>,
) -> bool {
    let labels = localizer.labels(EDITOR_KEYS);
    let now = Instant::now();
    ui.horizontal(|ui| {
        if ui.button(localizer.text("editor.create_file")).clicked() {
            actions.push(SessionAction::BeginCreate);
        }
        if ui.button("💾").on_hover_text("Ctrl+S").clicked() {
            actions.push(SessionAction::Save);
        }
        if let Some(key) = session.status(now) {
            ui.label(localizer.text(key));
        }
        if let Some(current) = session.current_file() {
            let relative = current.strip_prefix(session.root()).unwrap_or(current);
            ui.weak(relative.display().to_string());
        }
    });
    if let Some(expires_at) = session.status_expires_at() {
        if let Some(remaining) = expires_at.checked_duration_since(now) {
            ui.ctx().request_repaint_after(remaining);
        }
    }
    ui.separator();

    let mut focused = false;
    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(220.0);
            egui::ScrollArea::vertical()
                .id_source("tree")
                .show(ui, |ui| render_tree(ui, session, &labels, actions));
        });
        ui.separator();

        let enabled = session.current_file().is_some();
        let (buffer, highlighter) = session.buffer_and_highlighter_mut();
        let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
            let mut job = layout_job(highlighter, text, ui.visuals().text_color());
            job.wrap.max_width = wrap_width;
            ui.fonts(|fonts| fonts.layout_job(job))
        };
        egui::ScrollArea::both().id_source("buffer").show(ui, |ui| {
            let response = ui.add_enabled(
                enabled,
                egui::TextEdit::multiline(buffer)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(28)
                    .layouter(&mut layouter),
            );
            focused = response.has_focus();
        });
    });
    focused
}

fn render_tree(
    ui: &mut egui::Ui,
    session: &EditorSession,
    labels: &[(&str, &str)],
    actions: &mut Vec<SessionAction>,
) {
    let label = |key: &str| {
        labels
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, text)| *text)
            .unwrap_or(key)
            .to_string()
    };
    let rows = match session.tree().visible_rows() {
        Ok(rows) => rows,
        Err(err) => {
            ui.colored_label(ui.visuals().error_fg_color, err.to_string());
            return;
        }
    };
    let selected = session.tree().selected();
    for row in rows {
        let marker = match (row.node.kind, row.expanded) {
            (NodeKind::Directory, true) => "- ",
            (NodeKind::Directory, false) => "+ ",
            (NodeKind::File, _) => "  ",
        };
        let text = format!("{}{}{}", "    ".repeat(row.depth), marker, row.node.name);
        let is_selected = selected == Some(row.node.path.as_path());
        let response = ui.selectable_label(is_selected, egui::RichText::new(text).monospace());
        let path = row.node.path.clone();
        if response.clicked() {
            actions.push(SessionAction::Select(path.clone()));
            if row.node.kind.is_dir() {
                actions.push(SessionAction::Toggle(path.clone()));
            }
        }
        if response.double_clicked() && !row.node.kind.is_dir() {
            actions.push(SessionAction::Open(path.clone()));
        }
        response.context_menu(|ui| {
            if ui.button(label("editor.open")).clicked() && !row.node.kind.is_dir() {
                actions.push(SessionAction::Open(path.clone()));
                ui.close_menu();
            }
            if ui.button(label("editor.create_file")).clicked() {
                actions.push(SessionAction::BeginCreate);
                ui.close_menu();
            }
            if ui.button(label("editor.delete")).clicked() {
                actions.push(SessionAction::Delete(path.clone()));
                ui.close_menu();
            }
        });
    }
}

impl eframe::App for PrismApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_launcher(ctx);
        self.show_sessions(ctx);
        self.show_name_dialog(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.launcher.shutdown();
    }
}
