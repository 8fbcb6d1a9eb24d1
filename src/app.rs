// Copyright 2025 Pulvetech
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Main application: state, background tasks and all panels.
//!
//! The UI thread never blocks on the network. Every API call runs on the
//! tokio runtime and reports back through a channel of [`UiEvent`]s, which
//! the frame handler drains before drawing.

use eframe::egui;
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{Legend, Plot, PlotPoints, Points};
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pulvetech_api::{
    ApiError, Certification, Client, Drone, NewCertification, StatisticMetric, UploadResponse,
};

use crate::chart::{self, DeltaTRange, Series, WindRange};
use crate::config::AppConfig;
use crate::forms::{
    format_phone, CertificationForm, ContactForm, FieldKind, FieldState, SubmitPhase, Validity,
};
use crate::images::{resolve_server_url, DroneImageManager};
use crate::notifications::{MessageKind, NotificationCenter};
use crate::status::{ConnectionStatus, DiagnosticLevel, SharedSystemStatus, SystemStatus};
use crate::sync::{
    default_quality_slots, fill_quality_slots, home_statistics, ListState, QualitySlot,
    CERTIFICATIONS_EMPTY, CERTIFICATIONS_ERROR, DRONES_EMPTY, DRONES_ERROR, STATISTICS_ERROR,
};

const ACCENT: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
const ERROR_RED: Color32 = Color32::from_rgb(0xF4, 0x43, 0x36);
const WARN_ORANGE: Color32 = Color32::from_rgb(0xFF, 0x98, 0x00);

/// Completion events posted by background tasks to the UI thread.
enum UiEvent {
    CertificationsLoaded(Result<Vec<Certification>, ApiError>),
    DronesLoaded(Result<Vec<Drone>, ApiError>),
    StatisticsLoaded(Result<Vec<StatisticMetric>, ApiError>),
    CertificationSubmitted(Result<(), ApiError>),
    ContactSubmitted(Result<(), ApiError>),
    CertificationDeleted(Result<(), ApiError>),
    ConnectionChecked(bool),
}

/// Top-level navigation sections, mirroring the service's site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    Fleet,
    Certifications,
    Parameters,
    Contact,
}

impl Section {
    const ALL: [Self; 5] = [
        Self::Home,
        Self::Fleet,
        Self::Certifications,
        Self::Parameters,
        Self::Contact,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Home => "Início",
            Self::Fleet => "Frota",
            Self::Certifications => "Certificações",
            Self::Parameters => "Parâmetros",
            Self::Contact => "Contato",
        }
    }
}

pub struct PulvetechApp {
    // Never dropped while the app lives; background tasks run on it.
    runtime: tokio::runtime::Runtime,
    client: Arc<Client>,
    events: Receiver<UiEvent>,
    sender: Sender<UiEvent>,

    config: AppConfig,
    section: Section,

    certifications: ListState<Certification>,
    drones: ListState<Drone>,
    statistics: ListState<StatisticMetric>,
    home_stats: Vec<StatisticMetric>,
    quality_slots: [QualitySlot; 4],

    cert_form: CertificationForm,
    contact_form: ContactForm,
    show_cert_form: bool,
    pending_delete: Option<i64>,

    delta_t_filter: DeltaTRange,
    wind_filter: WindRange,
    chart_data: Vec<Series>,

    notifications: NotificationCenter,
    status: SharedSystemStatus,
    show_diagnostics: bool,
    images: Option<DroneImageManager>,
}

impl PulvetechApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        let client = Arc::new(Client::new(config.api_base_url.clone()));
        let (sender, events) = channel();
        let status: SharedSystemStatus = Arc::new(Mutex::new(SystemStatus::new()));

        let mut images = DroneImageManager::new(runtime.handle().clone())
            .map_err(|err| error!("Cache de imagens indisponível: {err}"))
            .ok();
        if let Some(manager) = images.as_mut() {
            manager.init_placeholder(&cc.egui_ctx);
        }

        let mut app = Self {
            runtime,
            client,
            events,
            sender,
            show_diagnostics: config.show_diagnostics,
            config,
            section: Section::Home,
            certifications: ListState::Loading,
            drones: ListState::Loading,
            statistics: ListState::Loading,
            home_stats: Vec::new(),
            quality_slots: default_quality_slots(),
            cert_form: CertificationForm::default(),
            contact_form: ContactForm::default(),
            show_cert_form: false,
            pending_delete: None,
            delta_t_filter: DeltaTRange::All,
            wind_filter: WindRange::All,
            chart_data: chart::parameter_datasets(),
            notifications: NotificationCenter::new(),
            status,
            images,
        };

        info!("Cliente apontado para {}", app.client.base_url());
        app.fetch_certifications(&cc.egui_ctx);
        app.fetch_drones(&cc.egui_ctx);
        app.fetch_statistics(&cc.egui_ctx);
        app.start_connection_probe(&cc.egui_ctx);
        app
    }

    /// Run a future on the runtime and post its event back to the UI.
    fn spawn_task<F>(&self, ctx: &egui::Context, fut: F)
    where
        F: std::future::Future<Output = UiEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let event = fut.await;
            if sender.send(event).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn fetch_certifications(&self, ctx: &egui::Context) {
        let client = self.client.clone();
        self.spawn_task(ctx, async move {
            UiEvent::CertificationsLoaded(client.list_certifications().await)
        });
    }

    fn fetch_drones(&self, ctx: &egui::Context) {
        let client = self.client.clone();
        self.spawn_task(ctx, async move { UiEvent::DronesLoaded(client.list_drones().await) });
    }

    fn fetch_statistics(&self, ctx: &egui::Context) {
        let client = self.client.clone();
        self.spawn_task(ctx, async move {
            UiEvent::StatisticsLoaded(client.list_statistics().await)
        });
    }

    /// Periodic reachability probe against the statistics endpoint.
    fn start_connection_probe(&self, ctx: &egui::Context) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        let interval = Duration::from_secs(self.config.connection_check_interval_secs.max(5));

        self.runtime.spawn(async move {
            loop {
                let reachable = client.list_statistics().await.is_ok();
                if sender.send(UiEvent::ConnectionChecked(reachable)).is_err() {
                    break; // UI is gone
                }
                ctx.request_repaint();
                tokio::time::sleep(interval).await;
            }
        });
    }

    /// Upload the attached file (if any) first, then create the record.
    fn submit_certification(&mut self, ctx: &egui::Context) {
        if self.cert_form.phase == SubmitPhase::Busy || !self.cert_form.validate_all() {
            return;
        }
        let Some(request) = self.cert_form.to_request(None) else {
            return;
        };
        self.cert_form.phase = SubmitPhase::Busy;

        let client = self.client.clone();
        let file = self.cert_form.file.clone();

        self.spawn_task(ctx, async move {
            UiEvent::CertificationSubmitted(create_certification(&client, request, file).await)
        });
    }

    fn submit_contact(&mut self, ctx: &egui::Context) {
        if self.contact_form.phase == SubmitPhase::Busy || !self.contact_form.validate_all() {
            return;
        }
        self.contact_form.phase = SubmitPhase::Busy;

        let client = self.client.clone();
        let request = self.contact_form.to_request();
        self.spawn_task(ctx, async move {
            UiEvent::ContactSubmitted(client.create_contact(&request).await)
        });
    }

    fn delete_certification(&mut self, ctx: &egui::Context, id: i64) {
        let client = self.client.clone();
        let list_client = self.client.clone();
        let sender = self.sender.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let (deleted, refreshed) = delete_then_resync(
                move || async move { client.delete_certification(id).await },
                move || async move { list_client.list_certifications().await },
            )
            .await;

            if sender.send(UiEvent::CertificationDeleted(deleted)).is_ok() {
                let _ = sender.send(UiEvent::CertificationsLoaded(refreshed));
                ctx.request_repaint();
            }
        });
    }

    fn handle_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                UiEvent::CertificationsLoaded(result) => {
                    self.certifications
                        .apply_fetch("certifications", CERTIFICATIONS_ERROR, result);
                }
                UiEvent::DronesLoaded(result) => {
                    self.drones.apply_fetch("drones", DRONES_ERROR, result);
                }
                UiEvent::StatisticsLoaded(result) => {
                    self.statistics
                        .apply_fetch("statistics", STATISTICS_ERROR, result);
                    if let ListState::Ready(metrics) = &self.statistics {
                        self.home_stats = home_statistics(metrics);
                        fill_quality_slots(&mut self.quality_slots, metrics);
                    }
                }
                UiEvent::CertificationSubmitted(result) => {
                    if apply_submission_outcome(
                        &mut self.cert_form,
                        &mut self.notifications,
                        &result,
                    ) {
                        self.show_cert_form = false;
                        self.fetch_certifications(ctx);
                    }
                }
                UiEvent::ContactSubmitted(result) => {
                    self.contact_form.phase = SubmitPhase::Idle;
                    match result {
                        Ok(()) => {
                            self.notifications.success(
                                "Solicitação enviada com sucesso! Entraremos em contato em breve.",
                            );
                            self.contact_form.reset();
                        }
                        Err(err) => {
                            self.notifications
                                .error(format!("Erro ao enviar solicitação: {err}"));
                        }
                    }
                }
                // The refreshed list follows as its own CertificationsLoaded
                // event; the background task re-synced already.
                UiEvent::CertificationDeleted(result) => match result {
                    Ok(()) => {
                        self.notifications
                            .success("Certificação excluída com sucesso!");
                    }
                    Err(err) => {
                        self.notifications
                            .error(format!("Erro ao excluir certificação: {err}"));
                        self.status.lock().unwrap().add_diagnostic(
                            DiagnosticLevel::Error,
                            format!("Exclusão falhou: {err}"),
                        );
                    }
                },
                UiEvent::ConnectionChecked(reachable) => {
                    self.status.lock().unwrap().record_probe(reachable);
                }
            }
        }
    }

    // --- drawing -----------------------------------------------------------

    fn draw_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("DronesPulvetech").strong().color(ACCENT).size(18.0));
                ui.separator();
                for section in Section::ALL {
                    if ui
                        .selectable_label(self.section == section, section.label())
                        .clicked()
                    {
                        self.section = section;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let status = self.status.lock().unwrap().connection_status;
                    let (text, color) = match status {
                        ConnectionStatus::Connected => ("Conectado", ACCENT),
                        ConnectionStatus::Disconnected => ("Desconectado", ERROR_RED),
                        ConnectionStatus::Unknown => ("Verificando...", Color32::GRAY),
                    };
                    ui.label(RichText::new(text).color(color));
                    ui.label(RichText::new("●").color(color));
                    if ui.small_button("Diagnóstico").clicked() {
                        self.show_diagnostics = !self.show_diagnostics;
                    }
                });
            });
        });
    }

    fn draw_home(&self, ui: &mut egui::Ui) {
        ui.heading("Pulverização agrícola de precisão com drones");
        ui.label("Tecnologia embarcada para aplicação eficiente, econômica e segura.");
        ui.add_space(16.0);

        match &self.statistics {
            ListState::Loading => {
                ui.spinner();
            }
            ListState::Failed(message) => {
                ui.colored_label(ERROR_RED, message);
            }
            ListState::Ready(_) => {
                ui.horizontal_wrapped(|ui| {
                    for metric in &self.home_stats {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.vertical(|ui| {
                                ui.label(
                                    RichText::new(metric.display_value())
                                        .strong()
                                        .color(ACCENT)
                                        .size(24.0),
                                );
                                ui.label(&metric.description);
                            });
                        });
                    }
                });
            }
        }

        ui.add_space(24.0);
        ui.heading("Parâmetros de Qualidade");
        ui.horizontal_wrapped(|ui| {
            for slot in &self.quality_slots {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(slot.title).strong());
                        ui.label(RichText::new(&slot.value).color(ACCENT).size(20.0));
                        ui.label(RichText::new(slot.description).small());
                    });
                });
            }
        });
    }

    fn draw_fleet(&self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Nossa Frota");
        ui.add_space(8.0);

        match &self.drones {
            ListState::Loading => {
                ui.spinner();
            }
            ListState::Failed(message) => {
                ui.colored_label(ERROR_RED, message);
            }
            ListState::Ready(drones) if drones.is_empty() => {
                ui.label(DRONES_EMPTY);
            }
            ListState::Ready(drones) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for drone in drones {
                            self.draw_drone_card(ui, ctx, drone);
                        }
                    });
                });
            }
        }
    }

    fn draw_drone_card(&self, ui: &mut egui::Ui, ctx: &egui::Context, drone: &Drone) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(240.0);
            ui.vertical(|ui| {
                if let Some(manager) = &self.images {
                    let texture = match &drone.image_path {
                        Some(path) if !path.is_empty() => {
                            let url = resolve_server_url(self.client.base_url(), path);
                            manager.get_or_load_texture(ctx, &url, drone.id)
                        }
                        _ => manager.get_placeholder().cloned(),
                    };
                    if let Some(texture) = texture {
                        ui.image(&texture);
                    }
                }

                ui.label(RichText::new(&drone.name).strong().size(16.0));
                ui.label(&drone.model);
                ui.separator();
                ui.label(format!("Capacidade: {} L", drone.capacity));
                ui.label(format!("Autonomia: {} min", drone.autonomy));
                ui.label(format!("Área por voo: {} ha", drone.area_per_flight));
                for (key, value) in &drone.specifications {
                    ui.label(RichText::new(format!("{key}: {value}")).small());
                }
            });
        });
    }

    fn draw_certifications(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.heading("Certificações dos Pilotos");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Adicionar Certificação").clicked() {
                    self.show_cert_form = true;
                }
            });
        });
        ui.add_space(8.0);

        let mut delete_request = None;
        match &self.certifications {
            ListState::Loading => {
                ui.spinner();
            }
            ListState::Failed(message) => {
                ui.colored_label(ERROR_RED, message);
            }
            ListState::Ready(certs) if certs.is_empty() => {
                ui.label(CERTIFICATIONS_EMPTY);
            }
            ListState::Ready(certs) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for cert in certs {
                            if let Some(id) = self.draw_certification_card(ui, cert) {
                                delete_request = Some(id);
                            }
                        }
                    });
                });
            }
        }

        if delete_request.is_some() {
            self.pending_delete = delete_request;
        }
        self.draw_delete_confirmation(ctx);
        self.draw_certification_form(ctx);
    }

    /// Returns the id when the delete control was clicked.
    fn draw_certification_card(&self, ui: &mut egui::Ui, cert: &Certification) -> Option<i64> {
        let mut delete = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(260.0);
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&cert.pilot_name).strong().size(16.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text("Excluir").clicked() {
                            delete = Some(cert.id);
                        }
                    });
                });

                ui.label(&cert.cert_type);
                ui.label(format!("Emissão: {}", cert.issue_date.format("%d/%m/%Y")));
                ui.label(format!("Validade: {}", cert.expiry_date.format("%d/%m/%Y")));

                let status = cert.validation_status;
                ui.colored_label(status_color(status), status.label());

                if let Some(path) = cert.file_path.as_deref().filter(|p| !p.is_empty()) {
                    if ui.link("Ver certificado").clicked() {
                        let url = resolve_server_url(self.client.base_url(), path);
                        if let Err(err) = webbrowser::open(&url) {
                            error!("Falha ao abrir certificado {url}: {err}");
                        }
                    }
                }
            });
        });
        delete
    }

    fn draw_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete else {
            return;
        };

        egui::Window::new("Confirmar exclusão")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Tem certeza que deseja excluir esta certificação?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Excluir").clicked() {
                        self.pending_delete = None;
                        self.delete_certification(ctx, id);
                    }
                    if ui.button("Cancelar").clicked() {
                        self.pending_delete = None;
                    }
                });
            });
    }

    fn draw_certification_form(&mut self, ctx: &egui::Context) {
        if !self.show_cert_form {
            return;
        }

        let mut open = true;
        let mut submit = false;
        egui::Window::new("Adicionar Certificação")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                validated_field(ui, "Nome do piloto", &mut self.cert_form.pilot_name, FieldKind::Text, true, false);
                validated_field(ui, "Tipo de certificação", &mut self.cert_form.cert_type, FieldKind::Text, true, false);
                validated_field(ui, "Data de emissão (dd/mm/aaaa)", &mut self.cert_form.issue_date, FieldKind::Date, true, false);
                validated_field(ui, "Data de validade (dd/mm/aaaa)", &mut self.cert_form.expiry_date, FieldKind::Date, true, false);

                ui.horizontal(|ui| {
                    if ui.button("Anexar arquivo...").clicked() {
                        self.cert_form.file = rfd::FileDialog::new()
                            .add_filter("Documentos", &["pdf", "jpg", "jpeg", "png"])
                            .pick_file();
                    }
                    match &self.cert_form.file {
                        Some(path) => {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_default();
                            ui.label(name);
                        }
                        None => {
                            ui.label(RichText::new("Nenhum arquivo selecionado").weak());
                        }
                    }
                });

                ui.add_space(8.0);
                let busy = self.cert_form.phase == SubmitPhase::Busy;
                let label = if busy { "Salvando..." } else { "Salvar" };
                if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                    submit = true;
                }
            });

        if submit {
            self.submit_certification(ctx);
        }
        if !open {
            self.show_cert_form = false;
        }
    }

    fn draw_parameters(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parâmetros de Aplicação");
        ui.label("Faixa efetiva de aplicação por modelo, conforme condições de voo.");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Delta T (°C):");
            egui::ComboBox::from_id_salt("delta_t_filter")
                .selected_text(self.delta_t_filter.label())
                .show_ui(ui, |ui| {
                    for range in DeltaTRange::ALL {
                        ui.selectable_value(&mut self.delta_t_filter, range, range.label());
                    }
                });

            ui.label("Vento (km/h):");
            egui::ComboBox::from_id_salt("wind_filter")
                .selected_text(self.wind_filter.label())
                .show_ui(ui, |ui| {
                    for range in WindRange::ALL {
                        ui.selectable_value(&mut self.wind_filter, range, range.label());
                    }
                });
        });

        let filtered =
            chart::filter_datasets(&self.chart_data, self.delta_t_filter, self.wind_filter);

        Plot::new("parametros_aplicacao")
            .legend(Legend::default())
            .include_x(chart::X_MIN)
            .include_x(chart::X_MAX)
            .include_y(chart::Y_MIN)
            .include_y(chart::Y_MAX)
            .x_axis_label("Velocidade do vento (km/h)")
            .y_axis_label("Altura de aplicação (m)")
            .height(380.0)
            .show(ui, |plot_ui| {
                for series in &filtered {
                    let coords: PlotPoints =
                        series.points.iter().map(|p| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(series.label, coords)
                            .color(series.color)
                            .radius(5.0),
                    );
                }
            });

        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            for series in &filtered {
                let swaths: Vec<String> =
                    series.points.iter().map(|p| format!("{} m", p.value)).collect();
                if !swaths.is_empty() {
                    ui.label(
                        RichText::new(format!("{}: {}", series.label, swaths.join(", ")))
                            .color(series.color)
                            .small(),
                    );
                }
            }
        });
    }

    fn draw_contact(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Solicite um Orçamento");
        ui.add_space(8.0);

        validated_field(ui, "Nome", &mut self.contact_form.name, FieldKind::Text, true, false);
        validated_field(ui, "E-mail", &mut self.contact_form.email, FieldKind::Email, true, false);
        validated_field(ui, "Telefone", &mut self.contact_form.phone, FieldKind::Phone, true, true);
        validated_field(ui, "Nome da propriedade", &mut self.contact_form.property_name, FieldKind::Text, true, false);
        validated_field(ui, "Área (hectares)", &mut self.contact_form.area_hectares, FieldKind::Text, true, false);

        ui.horizontal(|ui| {
            ui.label("Tipo de aplicação:");
            egui::ComboBox::from_id_salt("application_type")
                .selected_text(if self.contact_form.application_type.is_empty() {
                    "Selecione..."
                } else {
                    self.contact_form.application_type.as_str()
                })
                .show_ui(ui, |ui| {
                    for option in ["Herbicida", "Fungicida", "Inseticida", "Fertilizante foliar"] {
                        ui.selectable_value(
                            &mut self.contact_form.application_type,
                            option.to_string(),
                            option,
                        );
                    }
                });
        });

        validated_field(ui, "Observações", &mut self.contact_form.observations, FieldKind::Text, false, false);

        ui.add_space(8.0);
        let busy = self.contact_form.phase == SubmitPhase::Busy;
        let label = if busy { "Enviando..." } else { "Enviar Solicitação" };
        if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
            self.submit_contact(ctx);
        }
    }

    fn draw_notifications(&mut self, ctx: &egui::Context) {
        self.notifications.prune();
        let Some(notification) = self.notifications.visible() else {
            return;
        };

        let color = match notification.kind {
            MessageKind::Success => ACCENT,
            MessageKind::Error => ERROR_RED,
        };

        egui::Area::new(egui::Id::new("toast"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 48.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .stroke(Stroke::new(1.5, color))
                    .show(ui, |ui| {
                        ui.label(RichText::new(&notification.text).color(color));
                    });
            });

        // Keep repainting so the toast goes away without user input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }

    fn draw_diagnostics(&mut self, ctx: &egui::Context) {
        if !self.show_diagnostics {
            return;
        }

        let mut open = true;
        egui::Window::new("Diagnóstico")
            .open(&mut open)
            .default_size(egui::vec2(420.0, 260.0))
            .show(ctx, |ui| {
                let status = self.status.lock().unwrap();
                if let Some(checked) = status.last_check {
                    ui.label(format!(
                        "Última verificação: {}",
                        checked.format("%d/%m/%Y %H:%M:%S")
                    ));
                }
                ui.separator();
                egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                    for message in &status.diagnostics {
                        let color = match message.level {
                            DiagnosticLevel::Info => Color32::GRAY,
                            DiagnosticLevel::Warning => WARN_ORANGE,
                            DiagnosticLevel::Error => ERROR_RED,
                        };
                        ui.colored_label(
                            color,
                            format!(
                                "{} {}",
                                message.timestamp.format("%H:%M:%S"),
                                message.message
                            ),
                        );
                    }
                });
            });
        self.show_diagnostics = open;
    }
}

impl eframe::App for PulvetechApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_events(ctx);
        self.draw_nav(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.section {
                Section::Home => self.draw_home(ui),
                Section::Fleet => self.draw_fleet(ui, ctx),
                Section::Certifications => self.draw_certifications(ui, ctx),
                Section::Parameters => self.draw_parameters(ui),
                Section::Contact => self.draw_contact(ui, ctx),
            });
        });

        self.draw_diagnostics(ctx);
        self.draw_notifications(ctx);
    }
}

/// Full submission flow for a certification: read the attached file, then
/// run the dependent upload/create pair against the live client.
async fn create_certification(
    client: &Client,
    request: NewCertification,
    file: Option<PathBuf>,
) -> Result<(), ApiError> {
    let payload = match file {
        Some(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|err| ApiError::Upload(Box::new(ApiError::Io(err))))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "certificado".to_string());
            Some((name, bytes))
        }
        None => None,
    };

    upload_then_create(
        request,
        payload,
        |name, bytes| async move { client.upload_file(&name, bytes).await },
        |request| async move { client.create_certification(&request).await },
    )
    .await
}

/// Dependent submission steps in strict order: the upload settles before the
/// record is created, and an upload failure means no create call at all.
async fn upload_then_create<U, FU, C, FC>(
    mut request: NewCertification,
    file: Option<(String, Vec<u8>)>,
    upload: U,
    create: C,
) -> Result<(), ApiError>
where
    U: FnOnce(String, Vec<u8>) -> FU,
    FU: std::future::Future<Output = Result<UploadResponse, ApiError>>,
    C: FnOnce(NewCertification) -> FC,
    FC: std::future::Future<Output = Result<(), ApiError>>,
{
    if let Some((name, bytes)) = file {
        request.file_path = Some(upload(name, bytes).await?.path);
    }
    create(request).await
}

/// One confirmed delete: the delete call settles first, then the list is
/// fetched again exactly once, whatever the delete returned.
async fn delete_then_resync<D, FD, R, FR>(
    delete: D,
    resync: R,
) -> (Result<(), ApiError>, Result<Vec<Certification>, ApiError>)
where
    D: FnOnce() -> FD,
    FD: std::future::Future<Output = Result<(), ApiError>>,
    R: FnOnce() -> FR,
    FR: std::future::Future<Output = Result<Vec<Certification>, ApiError>>,
{
    let deleted = delete().await;
    let refreshed = resync().await;
    (deleted, refreshed)
}

/// Apply a settled certification submission. The submit control is restored
/// in every case; the form only resets on success. Returns whether the
/// certifications list must be re-synced.
fn apply_submission_outcome(
    form: &mut CertificationForm,
    notifications: &mut NotificationCenter,
    result: &Result<(), ApiError>,
) -> bool {
    form.phase = SubmitPhase::Idle;
    match result {
        Ok(()) => {
            notifications.success("Certificação adicionada com sucesso!");
            form.reset();
            true
        }
        Err(err) => {
            notifications.error(format!("Erro ao adicionar certificação: {err}"));
            false
        }
    }
}

fn status_color(status: pulvetech_api::ValidationStatus) -> Color32 {
    use pulvetech_api::ValidationStatus;
    match status {
        ValidationStatus::Valid => ACCENT,
        ValidationStatus::ExpiringSoon => WARN_ORANGE,
        ValidationStatus::Expired => ERROR_RED,
        ValidationStatus::Unknown => Color32::GRAY,
    }
}

/// A labelled text field with blur validation and a colored validity mark.
fn validated_field(
    ui: &mut egui::Ui,
    label: &str,
    field: &mut FieldState,
    kind: FieldKind,
    required: bool,
    masked_phone: bool,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.text_edit_singleline(&mut field.value);

        if response.changed() {
            if masked_phone {
                field.value = format_phone(&field.value);
            }
            field.on_changed();
        }
        if response.lost_focus() {
            field.on_blur(kind, required);
        }

        match field.validity {
            Validity::Valid => {
                ui.label(RichText::new("✔").color(ACCENT));
            }
            Validity::Invalid => {
                ui.label(RichText::new("✘").color(ERROR_RED));
            }
            Validity::Unset => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> NewCertification {
        NewCertification {
            pilot_name: "Maria Souza".to_string(),
            cert_type: "ANAC - Classe 3".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            file_path: None,
        }
    }

    #[tokio::test]
    async fn test_upload_runs_before_create_and_threads_path() {
        let calls = Mutex::new(Vec::new());
        let calls = &calls;

        let result = upload_then_create(
            request(),
            Some(("cert.pdf".to_string(), vec![1, 2, 3])),
            |name, _bytes| async move {
                calls.lock().unwrap().push("upload");
                assert_eq!(name, "cert.pdf");
                Ok(UploadResponse {
                    path: "/uploads/cert.pdf".to_string(),
                })
            },
            |req| async move {
                calls.lock().unwrap().push("create");
                assert_eq!(req.file_path.as_deref(), Some("/uploads/cert.pdf"));
                Ok(())
            },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(*calls.lock().unwrap(), ["upload", "create"]);
    }

    #[tokio::test]
    async fn test_upload_failure_skips_create() {
        let calls = Mutex::new(Vec::new());
        let calls = &calls;

        let result = upload_then_create(
            request(),
            Some(("cert.pdf".to_string(), vec![1])),
            |_name, _bytes| async move {
                calls.lock().unwrap().push("upload");
                Err(ApiError::Upload(Box::new(ApiError::Status { status: 500 })))
            },
            |_req| async move {
                calls.lock().unwrap().push("create");
                Ok(())
            },
        )
        .await;

        assert_eq!(result.unwrap_err().status(), Some(500));
        assert_eq!(*calls.lock().unwrap(), ["upload"]);
    }

    #[tokio::test]
    async fn test_no_file_creates_without_upload() {
        let calls = Mutex::new(Vec::new());
        let calls = &calls;

        let result = upload_then_create(
            request(),
            None,
            |_name, _bytes| async move {
                calls.lock().unwrap().push("upload");
                Ok(UploadResponse {
                    path: String::new(),
                })
            },
            |req| async move {
                calls.lock().unwrap().push("create");
                assert!(req.file_path.is_none());
                Ok(())
            },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(*calls.lock().unwrap(), ["create"]);
    }

    #[tokio::test]
    async fn test_delete_is_followed_by_exactly_one_resync() {
        let calls = Mutex::new(Vec::new());
        let calls = &calls;

        let (deleted, refreshed) = delete_then_resync(
            || async move {
                calls.lock().unwrap().push("delete");
                Err(ApiError::Status { status: 404 })
            },
            || async move {
                calls.lock().unwrap().push("resync");
                Ok(Vec::new())
            },
        )
        .await;

        // The re-sync runs even when the delete itself failed.
        assert_eq!(deleted.unwrap_err().status(), Some(404));
        assert!(refreshed.unwrap().is_empty());
        assert_eq!(*calls.lock().unwrap(), ["delete", "resync"]);
    }

    #[test]
    fn test_submit_control_restored_on_failure() {
        let mut form = CertificationForm::default();
        form.pilot_name.value = "Maria".to_string();
        form.phase = SubmitPhase::Busy;
        let mut notifications = NotificationCenter::new();

        let resync = apply_submission_outcome(
            &mut form,
            &mut notifications,
            &Err(ApiError::Status { status: 500 }),
        );

        assert!(!resync);
        assert_eq!(form.phase, SubmitPhase::Idle);
        // Entered values survive for correction.
        assert_eq!(form.pilot_name.value, "Maria");
        assert_eq!(notifications.visible().unwrap().kind, MessageKind::Error);
    }

    #[test]
    fn test_submit_success_resets_form_and_requests_resync() {
        let mut form = CertificationForm::default();
        form.pilot_name.value = "Maria".to_string();
        form.phase = SubmitPhase::Busy;
        let mut notifications = NotificationCenter::new();

        let resync = apply_submission_outcome(&mut form, &mut notifications, &Ok(()));

        assert!(resync);
        assert_eq!(form.phase, SubmitPhase::Idle);
        assert!(form.pilot_name.value.is_empty());
        assert_eq!(notifications.visible().unwrap().kind, MessageKind::Success);
    }
}
