//! Report Panel
//! Two-step pollution report window. Accepted reports are only kept in memory.

use crate::report::{
    FieldErrors, PollutionType, ReportField, ReportForm, ReportStep, Severity, SubmittedReport,
};
use egui::{Color32, ComboBox, RichText};
use tracing::info;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

pub struct ReportPanel {
    pub open: bool,
    form: ReportForm,
    step: ReportStep,
    errors: FieldErrors,
    submitted: Vec<SubmittedReport>,
    notice: Option<String>,
}

impl Default for ReportPanel {
    fn default() -> Self {
        Self {
            open: false,
            form: ReportForm::default(),
            step: ReportStep::Incident,
            errors: FieldErrors::new(),
            submitted: Vec::new(),
            notice: None,
        }
    }
}

impl ReportPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> &[SubmittedReport] {
        &self.submitted
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let mut open = self.open;
        egui::Window::new("Report Pollution")
            .open(&mut open)
            .resizable(false)
            .default_width(420.0)
            .show(ctx, |ui| match self.step {
                ReportStep::Incident => self.incident_step(ui),
                ReportStep::Contact => self.contact_step(ui),
            });
        self.open = open;
    }

    fn field_error(&self, ui: &mut egui::Ui, field: ReportField) {
        if let Some(message) = self.errors.get(&field) {
            ui.label(RichText::new(*message).size(11.0).color(ERROR_COLOR));
        }
    }

    fn incident_step(&mut self, ui: &mut egui::Ui) {
        if let Some(notice) = &self.notice {
            ui.label(RichText::new(notice).color(Color32::from_rgb(40, 167, 69)));
            ui.label(
                RichText::new(format!("{} report(s) this session", self.submitted().len()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            ui.separator();
        }
        ui.label(RichText::new("Step 1 of 2: Incident").strong());
        ui.add_space(6.0);

        ui.label("Pollution type");
        ComboBox::from_id_salt("pollution_type")
            .width(250.0)
            .selected_text(
                self.form
                    .pollution_type
                    .map(PollutionType::label)
                    .unwrap_or("Select type"),
            )
            .show_ui(ui, |ui| {
                for kind in PollutionType::ALL {
                    ui.selectable_value(&mut self.form.pollution_type, Some(kind), kind.label());
                }
            });
        self.field_error(ui, ReportField::PollutionType);

        ui.add_space(4.0);
        ui.label("Description");
        ui.text_edit_multiline(&mut self.form.description);
        self.field_error(ui, ReportField::Description);

        ui.add_space(4.0);
        ui.label("Location");
        ui.text_edit_singleline(&mut self.form.location);
        self.field_error(ui, ReportField::Location);

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Severity");
            for severity in [Severity::Low, Severity::Medium, Severity::High] {
                ui.radio_value(&mut self.form.severity, severity, severity.to_string());
            }
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("🖼 Add images").clicked() {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
                    .pick_files()
                {
                    self.form.images.extend(paths);
                }
            }
            ui.label(format!("{} selected", self.form.images.len()));
            if !self.form.images.is_empty() && ui.small_button("Clear").clicked() {
                self.form.images.clear();
            }
        });
        self.field_error(ui, ReportField::Images);

        ui.add_space(8.0);
        if ui.button("Next ▶").clicked() {
            self.errors = self.form.validate(ReportStep::Incident);
            if self.errors.is_empty() {
                self.step = ReportStep::Contact;
                self.notice = None;
            }
        }
    }

    fn contact_step(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Step 2 of 2: Contact").strong());
        ui.add_space(6.0);

        ui.checkbox(&mut self.form.anonymous, "Report anonymously");
        ui.add_enabled_ui(!self.form.anonymous, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut self.form.name);
        });
        self.field_error(ui, ReportField::Name);
        ui.add_enabled_ui(!self.form.anonymous, |ui| {
            ui.label("Email");
            ui.text_edit_singleline(&mut self.form.email);
        });
        self.field_error(ui, ReportField::Email);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("◀ Back").clicked() {
                self.errors.clear();
                self.step = ReportStep::Incident;
            }
            if ui.button("Submit").clicked() {
                self.submit();
            }
        });
    }

    fn submit(&mut self) {
        match self.form.submit() {
            Ok(report) => {
                info!(
                    kind = report.pollution_type.label(),
                    severity = %report.severity,
                    images = report.image_count,
                    "Pollution report accepted"
                );
                self.submitted.push(report);
                self.form = ReportForm::default();
                self.errors.clear();
                self.step = ReportStep::Incident;
                self.notice = Some(format!(
                    "Thank you! Report #{} has been recorded.",
                    self.submitted.len()
                ));
            }
            Err(errors) => self.errors = errors,
        }
    }
}
