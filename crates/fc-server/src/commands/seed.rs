use serde::Serialize;

use fc_db::service::FleetService;

use crate::bootstrap::read_seed_file;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SeedArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SeedOutput {
    staff_inserted: usize,
    assets_inserted: usize,
}

pub async fn handle(args: &SeedArgs, service: &FleetService, flags: &GlobalFlags) -> anyhow::Result<()> {
    let seed = read_seed_file(&args.file)?;
    let report = service.seed_if_empty(seed).await?;
    output(
        &SeedOutput {
            staff_inserted: report.staff,
            assets_inserted: report.assets,
        },
        flags.format,
    )
}
