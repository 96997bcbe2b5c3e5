use std::path::{Path, PathBuf};

use eframe::egui;

use crate::annotation::Annotation;
use crate::catalog::Catalog;
use crate::config::{self, AppConfig};
use crate::error::Error;
use crate::persist;

/// Preview bounds; images are scaled down to fit, preserving aspect.
const PREVIEW_MAX_WIDTH: u32 = 800;
const PREVIEW_MAX_HEIGHT: u32 = 600;

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotatorApp {
    catalog: Catalog,
    annotation: Annotation,
    person_input: String,

    texture: Option<egui::TextureHandle>,
    preview_failed: bool,
    status: String,

    // Enter in the location field hands focus to the date field on the
    // next frame, since that widget is built later in the same pass.
    focus_date: bool,

    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl AnnotatorApp {
    pub fn new() -> Self {
        let config_path = config::config_path();
        let config = AppConfig::load(config_path.as_deref());
        Self {
            catalog: Catalog::default(),
            annotation: Annotation::default(),
            person_input: String::new(),
            texture: None,
            preview_failed: false,
            status: "Select an image folder to begin.".to_string(),
            focus_date: false,
            config,
            config_path,
        }
    }

    fn select_source_directory(&mut self) {
        let mut dialog = rfd::FileDialog::new().set_title("Select image folder");
        if let Some(ref last) = self.config.last_source_dir {
            dialog = dialog.set_directory(last);
        }
        let Some(dir) = dialog.pick_folder() else {
            return;
        };

        match Catalog::scan(&dir) {
            Ok(catalog) => {
                self.catalog = catalog;
                self.config.last_source_dir = Some(dir);
                self.config.store(self.config_path.as_deref());
                self.show_current();
            }
            // The previous catalog stays usable.
            Err(err) => error_dialog("Folder error", &err),
        }
    }

    fn select_output_directory(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_title("Select output folder")
            .pick_folder()
        else {
            return;
        };
        self.config.output_dir = dir;
        self.config.store(self.config_path.as_deref());

        let note = format!(
            "Annotated images will be written to {}.",
            self.config.output_dir.display()
        );
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title("Output folder")
            .set_description(note)
            .show();
    }

    fn navigate(&mut self, step: isize) {
        if self.catalog.is_empty() {
            return;
        }
        self.catalog.advance(step);
        self.show_current();
    }

    /// Pull the annotation for the image under the cursor and drop the
    /// cached preview so it is rebuilt on the next frame. Unsaved edits
    /// to the previous image are discarded here.
    fn show_current(&mut self) {
        self.texture = None;
        self.preview_failed = false;
        self.person_input.clear();
        match self.catalog.current() {
            Some(path) => {
                self.annotation = persist::load_annotation(path);
                self.status = format!(
                    "{} ({} of {})",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    self.catalog.position() + 1,
                    self.catalog.len()
                );
            }
            None => {
                self.annotation = Annotation::default();
                self.status = "No images in the selected folder.".to_string();
            }
        }
    }

    fn commit_person(&mut self) {
        let person = self.person_input.trim();
        if !person.is_empty() {
            self.annotation.persons.push(person.to_string());
        }
        self.person_input.clear();
    }

    fn save(&mut self) {
        let Some(source) = self.catalog.current().map(Path::to_path_buf) else {
            return;
        };
        match persist::save_annotation(&source, &self.annotation, &self.config.output_dir) {
            Ok(out_path) => {
                self.status = format!("Saved {}", out_path.display());
            }
            Err(err @ Error::DateFormat(_)) => error_dialog("Invalid date", &err),
            Err(err) => error_dialog("Save failed", &err),
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() || self.preview_failed {
            return;
        }
        let Some(path) = self.catalog.current() else {
            return;
        };
        match image::open(path) {
            Ok(img) => {
                let preview = img.thumbnail(PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT);
                let rgba = preview.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.as_flat_samples();
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
                self.texture = Some(ctx.load_texture(
                    "preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
            Err(err) => {
                log::warn!("{}: cannot decode image: {err}", path.display());
                self.status = format!("Cannot display {}: {err}", path.display());
                self.preview_failed = true;
            }
        }
    }
}

fn error_dialog(title: &str, err: &Error) {
    log::error!("{title}: {err}");
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(err.to_string())
        .show();
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        // Arrow keys navigate unless a text field has focus.
        let editing = ctx.memory(|m| m.focused().is_some());
        if !editing {
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                self.navigate(-1);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                self.navigate(1);
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Image folder…").clicked() {
                    self.select_source_directory();
                }
                if ui.button("Output folder…").clicked() {
                    self.select_output_directory();
                }
                ui.separator();
                if ui.button("◀ Previous").clicked() {
                    self.navigate(-1);
                }
                if ui.button("Next ▶").clicked() {
                    self.navigate(1);
                }
                ui.separator();
                if ui.button("Save").clicked() {
                    self.save();
                }
            });
        });

        egui::TopBottomPanel::bottom("fields").show(ctx, |ui| {
            egui::Grid::new("annotation_fields")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Person:");
                    let person_edit = ui.add(
                        egui::TextEdit::singleline(&mut self.person_input)
                            .hint_text("name, Enter adds it to the list"),
                    );
                    if person_edit.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        self.commit_person();
                        person_edit.request_focus();
                    }
                    ui.end_row();

                    ui.label("Location:");
                    let location_edit = ui.add(
                        egui::TextEdit::singleline(&mut self.annotation.location)
                            .hint_text("place of capture"),
                    );
                    if location_edit.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        self.focus_date = true;
                    }
                    ui.end_row();

                    ui.label("Date:");
                    let date_edit = ui.add(
                        egui::TextEdit::singleline(&mut self.annotation.date)
                            .hint_text("DD.MM.YYYY"),
                    );
                    if self.focus_date {
                        date_edit.request_focus();
                        self.focus_date = false;
                    }
                    if date_edit.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        self.save();
                    }
                    ui.end_row();
                });

            ui.separator();
            ui.label(format!(
                "Persons: {} | Location: {} | Date: {}",
                self.annotation.persons.join(", "),
                self.annotation.location,
                self.annotation.date
            ));
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| match self.texture {
                Some(ref tex) => {
                    ui.image(tex);
                }
                None => {
                    ui.label("No image");
                }
            });
        });
    }
}
