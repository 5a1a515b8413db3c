//! Grab 10 images of cats with the default backend and 2 concurrent
//! downloads, logging every step.

use color_eyre::Result;
use imgrab::{GrabberBuilder, Status};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("imgrab=debug"))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "cats".to_string());
    let grabber = GrabberBuilder::new(query)
        .limit(10)
        .max_concurrent(2)
        .out_base(PathBuf::from("downloads"))
        .on_complete(|summary| {
            if let Status::Fail(error) = summary.status() {
                println!("[Failed] #{} - {}", summary.index(), error);
            }
        })
        .build()?;

    let report = grabber.run().await?;
    println!("{}", report);

    Ok(())
}
