use abpack_io::read_training_table;
use abpack_model::{train_model, MlpConfig};
use std::path::Path;
use tracing::info;

pub fn execute(input: &Path, model: &Path, config: MlpConfig) -> anyhow::Result<()> {
    let table = read_training_table(input)?;
    let trained = train_model(&table, config)?;
    trained.save(model)?;
    info!(model = %model.display(), "saved model");
    Ok(())
}
