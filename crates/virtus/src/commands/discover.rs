//! Discover command: list air-conditioner nodes in the home.

use tabled::Tabled;

use virtus_core::Device;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Node")]
    node_id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Category")]
    icon: String,
}

pub async fn handle(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = device.discover().await?;

    if devices.is_empty() && !global.quiet {
        eprintln!("no air conditioners found in this home");
    }

    println!(
        "{}",
        output::render_list(
            global.output,
            &devices,
            |d| DeviceRow {
                node_id: d.node_id.clone(),
                label: d.label.clone(),
                icon: d.icon.clone(),
            },
            |d| d.node_id.clone(),
        )
    );
    Ok(())
}
