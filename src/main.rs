use tonecard::Config;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load();
    tonecard::start(&config)
}
