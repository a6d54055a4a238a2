use anyhow::Result;

use foxkit_config::AppConfig;
use foxkit_scene::scenes;
use foxkit_scene::{App, SceneDB};

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = AppConfig::load();
    log::info!(
        "starting {} ({}x{})",
        config.window.title,
        config.window.width,
        config.window.height
    );

    let mut db = SceneDB::new();
    scenes::register_scenes(&mut db)?;

    App::new(config, db)?.run()
}
