use jma_forecast::config::{Config, DEFAULT_CONFIG_PATH};
use jma_forecast::db::ForecastCache;
use jma_forecast::logging::{self, DataSource};
use jma_forecast::{regions, shell};
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(DEFAULT_CONFIG_PATH)?;
    logging::init_logger(&config.log_level, config.log_file.as_deref())?;
    logging::info(
        DataSource::System,
        None,
        &format!("Starting forecast shell, cache at {}", config.cache_path.display()),
    );

    let client = reqwest::blocking::Client::new();

    // Without the directory there is nothing to navigate.
    let dir = regions::load(&client, &config.area_url)?;

    let cache = match ForecastCache::open(&config.cache_path) {
        Ok(cache) => Some(cache),
        Err(e) => {
            logging::error(
                DataSource::Cache,
                None,
                &format!("Cache disabled, {} could not be opened: {}", config.cache_path.display(), e),
            );
            None
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", shell::render_centers(&dir));
        let Some(input) = prompt(&mut lines)? else {
            return Ok(());
        };
        if input.trim() == "q" {
            return Ok(());
        }

        let centers = regions::centers(&dir);
        let Some(index) = shell::parse_choice(&input, centers.len()) else {
            continue;
        };
        let center_code = centers[index].0;

        loop {
            print!("{}", shell::render_offices(center_code, &dir));
            let Some(input) = prompt(&mut lines)? else {
                return Ok(());
            };
            if input.trim() == "b" {
                break;
            }

            let offices = regions::offices_of_center(center_code, &dir);
            let Some(index) = shell::parse_choice(&input, offices.len()) else {
                continue;
            };

            let view = shell::show_forecast(&client, &config, cache.as_ref(), &dir, offices[index].0);
            print!("{}", shell::render_forecast(&view));
            if prompt(&mut lines)?.is_none() {
                return Ok(());
            }
        }
    }
}

/// Print the prompt and read one line; `None` on end of input.
fn prompt<B: BufRead>(lines: &mut io::Lines<B>) -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    lines.next().transpose()
}
