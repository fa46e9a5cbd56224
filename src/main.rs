mod api;
mod dao;
mod model;
mod service;
mod view;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use crate::api::endpoints::{demo_data_add, edit_close, municipality_page, parish_create, parish_delete, parish_page, parish_update};
use crate::api::middleware::timing_middleware;
use crate::api::state::AppState;
use crate::dao::backend::BackendDao;
use crate::dao::registry::RegistryDao;
use crate::model::apperror::{ApplicationError, ErrorType};
use crate::model::config::{ApplicationArguments, HttpsConfig, LoggingConfig};
use crate::service::editor::RecordEditor;
use crate::service::fetcher::ReferenceFetcher;
use crate::service::loader::PageLoader;
use crate::service::synchronizer::ReferenceSynchronizer;

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use clap::Parser;
use prometheus::IntCounter;
use rustls::pki_types::PrivateKeyDer;
use rustls::{ServerConfig, SupportedProtocolVersion};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/**
 * Entry point of the dashboard.
 */
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = ApplicationArguments::parse();

    let config = get_config(&args.config_file)?;

    init_tracing(&config.logging)?;

    let client = reqwest::Client::builder().build().map_err(|err| std::io::Error::other(format!("Failed to create http client: {err}")))?;
    let backend = Arc::new(BackendDao::new(client.clone(), &config.backend.base_url));
    let registry = Arc::new(RegistryDao::new(client, &config.registry.municipalities_url));

    let prometheus = PrometheusMetricsBuilder::new("")
        .endpoint("/metrics")
        .mask_unmatched_patterns("UNKNOWN")
        .build()
        .map_err(|err| std::io::Error::other(format!("Failed to create Prometheus metrics: {err}")))?;

    let synchronizations_counter =
        IntCounter::new("municipality_synchronizations", "Municipality seeds sent to the backend").map_err(|err| std::io::Error::other(format!("Failed to create municipality_synchronizations counter: {err}")))?;
    let mutations_counter = IntCounter::new("parish_mutations", "Parish mutations sent to the backend").map_err(|err| std::io::Error::other(format!("Failed to create parish_mutations counter: {err}")))?;
    register_prometheus_metrics(&prometheus, &synchronizations_counter)?;
    register_prometheus_metrics(&prometheus, &mutations_counter)?;

    let fetcher = ReferenceFetcher::new(backend.clone(), registry);
    let synchronizer = Arc::new(ReferenceSynchronizer::new(fetcher.clone(), backend.clone(), config.synchronization.seed_policy, synchronizations_counter));
    let record_editor = Arc::new(RecordEditor::new(fetcher.clone(), backend, mutations_counter));
    let page_loader = PageLoader::new(fetcher, synchronizer, record_editor.clone());

    let state = web::Data::new(AppState::new(page_loader, record_editor));

    let server_init = HttpServer::new(move || {
        App::new()
            .wrap(prometheus.clone())
            .wrap(from_fn(timing_middleware))
            .app_data(state.clone())
            .service(parish_page)
            .service(municipality_page)
            .service(parish_create)
            .service(parish_update)
            .service(edit_close)
            .service(parish_delete)
            .service(demo_data_add)
    });

    let server_init = if let Some(http_port) = &config.server.http_port {
        info!("Listening on http://127.0.0.1:{http_port}");
        server_init.bind(("127.0.0.1", *http_port))?
    } else {
        server_init
    };
    let server_init = if let Some(https_config) = &config.server.https_config {
        let ssl_builder = ssl_builder(https_config).map_err(|err| std::io::Error::other(format!("Failed to create SSL/TLS configuration: {err}")))?;
        info!("Listening on https://127.0.0.1:{}", https_config.port);
        server_init.bind_rustls_0_23(("127.0.0.1", https_config.port), ssl_builder).map_err(|err| std::io::Error::other(format!("Failed to bind HTTPS server: {err}")))?
    } else {
        server_init
    };

    server_init.workers(config.server.workers).run().await
}

/**
 * Initializes logging for the application.
 *
 * #Arguments
 * `logging_config`: Which fields to log, extra filter directives and an optional log file.
 *
 * #Returns
 * A `Result` indicating success or failure.
 */
fn init_tracing(logging_config: &LoggingConfig) -> Result<(), std::io::Error> {
    let filter = logging_config.directives.iter().try_fold(EnvFilter::from_default_env(), |filter, directive| {
        directive
            .parse::<Directive>()
            .map(|directive| filter.add_directive(directive))
            .map_err(|err| std::io::Error::other(format!("Invalid logging directive {directive}: {err}")))
    })?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(logging_config.target)
        .with_thread_ids(logging_config.thread_ids)
        .with_thread_names(logging_config.thread_names)
        .with_line_number(logging_config.line_number)
        .with_level(logging_config.level)
        .with_ansi(logging_config.ansi)
        .with_file(logging_config.file);

    let initialized = match &logging_config.logfile {
        Some(logfile) => {
            let file = OpenOptions::new().create(true).append(true).open(logfile).map_err(|err| std::io::Error::other(format!("Failed to open log file {logfile}: {err}")))?;
            tracing_subscriber::registry().with(filter).with(fmt_layer.with_writer(Mutex::new(file))).try_init()
        }
        None => tracing_subscriber::registry().with(filter).with(fmt_layer).try_init(),
    };
    initialized.map_err(|err| std::io::Error::other(format!("Failed to initialize logging: {err}")))
}

/**
 * Registers custom Prometheus metrics.
 *
 * #Arguments
 * `prometheus_metrics`: The Prometheus metrics instance to register the counter with.
 * `counter`: The counter to register.
 */
fn register_prometheus_metrics(prometheus_metrics: &PrometheusMetrics, counter: &IntCounter) -> Result<(), std::io::Error> {
    prometheus_metrics.registry.register(Box::new(counter.clone())).map_err(|err| std::io::Error::other(format!("Failed to register Prometheus counter: {err}")))?;
    Ok(())
}

/**
 * Initializes the SSL/TLS configuration for the server.
 *
 * #Arguments
 * `https_config`: The HTTPS configuration containing the certificate and private key files.
 *
 * #Returns
 * A `Result` containing the initialized `ServerConfig` or an `ApplicationError` if initialization fails.
 */
fn ssl_builder(https_config: &HttpsConfig) -> Result<ServerConfig, ApplicationError> {
    let config_builder = ServerConfig::builder_with_protocol_versions(&get_protocol_versions());
    let cert_file =
        &mut std::io::BufReader::new(std::fs::File::open(&https_config.certificate_file).map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to read certificate file: {err}")))?);
    let key_file =
        &mut std::io::BufReader::new(std::fs::File::open(&https_config.private_key_file).map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to read private key file: {err}")))?);
    let cert_chain = certs(cert_file).collect::<Result<Vec<_>, _>>().map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to convert certificate to der: {err}")))?;
    let private_key = pkcs8_private_keys(key_file)
        .next()
        .ok_or_else(|| ApplicationError::new(ErrorType::Initialization, "No private key found in private key file".to_string()))?
        .map(PrivateKeyDer::Pkcs8)
        .map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to convert private key to der: {err}")))?;
    config_builder
        .with_no_client_auth()
        .with_single_cert(cert_chain, private_key)
        .map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to create server config: {err}")))
}

/**
 * Returns the supported TLS protocol versions.
 */
fn get_protocol_versions() -> Vec<&'static SupportedProtocolVersion> {
    vec![&rustls::version::TLS13, &rustls::version::TLS12]
}

/**
 * Reads the configuration from the specified file.
 *
 * #Arguments
 * `config_file`: The path to the configuration file.
 *
 * #Returns
 * A `Result` containing the parsed `Config` or an `std::io::Error` if reading or parsing fails.
*/
fn get_config(config_file: &str) -> Result<model::config::Config, std::io::Error> {
    let config_str: String = std::fs::read_to_string(config_file).map_err(|err| std::io::Error::other(format!("Failed to read config file: {err}")))?;
    let config: model::config::Config = toml::from_str(&config_str).map_err(|err| std::io::Error::other(format!("Failed to parse config file: {err}")))?;
    Ok(config)
}
