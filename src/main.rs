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

mod app;
mod chart;
mod config;
mod forms;
mod images;
mod notifications;
mod status;
mod sync;

use clap::Parser;
use log::{info, warn};

use app::PulvetechApp;
use config::AppConfig;

/// Desktop client for the DronesPulvetech service.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Override the configured API base URL for this run
    #[arg(long)]
    api_url: Option<String>,

    /// Show the diagnostics window on startup
    #[arg(long)]
    diagnostics: bool,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_else(|err| {
        warn!("Configuração inválida, usando padrões: {err}");
        AppConfig::default()
    });
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if args.diagnostics {
        config.show_diagnostics = true;
    }

    info!("Iniciando Pulvetech Desktop");
    if let Ok(path) = AppConfig::get_config_path() {
        info!("Configuração em {}", path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Pulvetech Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "Pulvetech Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(PulvetechApp::new(cc, config)))),
    )
}
