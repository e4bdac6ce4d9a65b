//! `video2glb-client` -- send a video to the relay and save the model.
//!
//! Waits for the relay server to answer, uploads the video and writes the
//! returned GLB to disk.
//!
//! # Environment variables
//!
//! | Variable                     | Default                  | Description                          |
//! |------------------------------|--------------------------|--------------------------------------|
//! | `RELAY_SERVER_URL`           | `http://127.0.0.1:5001`  | Relay base URL                       |
//! | `RELAY_VIDEO_PATH`           | `../videos/fountain.mp4` | Video to upload                      |
//! | `RELAY_OUTPUT_PATH`          | `vggt/scene.glb`         | Where the model is written           |
//! | `RELAY_READY_TIMEOUT_SECS`   | `60`                     | How long to wait for the server      |
//! | `RELAY_REQUEST_TIMEOUT_SECS` | `600`                    | Timeout for the upload request       |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video2glb_client::config::ClientConfig;
use video2glb_client::error::ClientError;
use video2glb_client::upload::upload_video;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video2glb_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    let http = reqwest::Client::new();

    tracing::info!(server = %config.server_url, "Waiting for relay server");

    match upload_video(&http, &config).await {
        Ok(outcome) => {
            println!(
                "GLB file saved to {} ({} bytes)",
                outcome.output_path.display(),
                outcome.bytes
            );
        }
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    }
}

fn report_failure(err: &ClientError) {
    match err {
        ClientError::ServerUnreachable { .. } => {
            eprintln!("{err}. Is the relay server running?");
        }
        ClientError::RequestTimeout { .. } => {
            eprintln!("{err}. Try again later or raise RELAY_REQUEST_TIMEOUT_SECS.");
        }
        ClientError::Http { status, message } => {
            eprintln!("Error from server ({status}): {message}");
        }
        _ => eprintln!("Error: {err}"),
    }
}
