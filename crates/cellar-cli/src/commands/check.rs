use cellar_core::storage::CellarStore;

use crate::app::AppContext;

pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    match store.check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                println!("Integrity check: OK");
                println!("- foreign keys: OK");
                println!("- occupancy flags: OK");
                println!("- zone membership: OK");
                println!("- position totals: OK");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Integrity check: FAILED");
            eprintln!("- error: {}", err);
            Err(anyhow::anyhow!("Integrity check failed"))
        }
    }
}
