mod cli;
mod config;
mod i2c;
mod sensors;

use std::time::Duration;

use clap::Parser;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

#[cfg(unix)]
use tokio::signal::unix::SignalKind;
use tokio::signal::{self};

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();
    let config = config::Config::from_cli(&args);

    let token = CancellationToken::new();

    // MAG
    {
        let token = token.child_token();
        let mut reader = sensors::mag::reader::Reader::new(token.clone(), config).unwrap();
        tokio::spawn(async move {
            while !token.is_cancelled() {
                if let Some(data) = reader.next().await {
                    match data {
                        Ok(data) => {
                            println!("{}\n", data);
                        }
                        Err(_e) => {
                            // Capteur pas encore prêt ou en erreur
                        }
                    }
                }

                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        });
    }

    #[cfg(unix)]
    {
        let mut test = tokio::signal::unix::signal(SignalKind::interrupt()).unwrap();
        tokio::select! {
            _ = test.recv() => {
                println!("Signal d'interruption reçu");
                token.cancel();
            },
            _ = signal::ctrl_c() => {
                println!("Signal de contrôle C reçu");
                token.cancel();
            },
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = signal::ctrl_c() => {
                println!("Signal de contrôle C reçu");
                token.cancel();
            },
        }
    }
}
