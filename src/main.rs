use std::error::Error;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use tokio_util::sync::CancellationToken;

use result_analyzer::api;
use result_analyzer::config::{Cli, Command, ServeConfig};
use result_analyzer::responder::{self, BotReply};
use result_analyzer::store::{self, SessionStore};
use result_analyzer::telemetry;

async fn start_api(config: ServeConfig) -> std::io::Result<()> {
    let store = Arc::new(SessionStore::new(config.reply_delay(), config.session_ttl()));
    let stop_sweeper = CancellationToken::new();
    let sweeper = store::spawn_sweeper(
        Arc::clone(&store),
        config.sweep_interval(),
        stop_sweeper.clone(),
    );
    let store = web::Data::from(store);

    tracing::info!(
        host = %config.host,
        port = config.port,
        reply_delay_ms = config.reply_delay_ms,
        session_ttl_secs = config.session_ttl_secs,
        "starting Result Analyzer on http://{}:{}",
        config.host,
        config.port
    );

    let served = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    stop_sweeper.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "session sweeper ended abnormally");
    }
    served
}

fn print_reply(reply: &BotReply) {
    println!("{}", reply.text);
    if let Some(rows) = &reply.table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Name", "Roll No", "SGPA"]);
        for row in rows {
            table.add_row(vec![&row.name, &row.roll_no, &row.sgpa]);
        }
        println!("{table}");
    }
    if let Some(stats) = &reply.stats {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        for stat in stats {
            table.add_row(vec![&stat.label, &stat.value]);
        }
        println!("{table}");
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format, cli.verbose);

    match cli.command {
        Some(Command::Ask { query }) => {
            let reply = responder::classify(&query.join(" "));
            print_reply(&reply);
        }
        Some(Command::Serve(config)) => start_api(config).await?,
        None => start_api(ServeConfig::from_env()).await?,
    }

    Ok(())
}
