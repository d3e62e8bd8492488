//! Launches chromedriver, opens Wikipedia and drives its search form.
//!
//! Requires a chromedriver binary on PATH (or next to the working
//! directory). Configuration is read from `selenite.json` if present.

use std::time::Duration;

use color_eyre::eyre::Result;
use selenite::prelude::*;
use selenite::{ClientConfig, DriverLauncher, WebDriver};

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = ClientConfig::load("selenite.json")?;

    let mut launcher = DriverLauncher::from_config(&config.webdriver)?;
    if !config.webdriver.manual_start {
        launcher.start()?;
    }

    let mut driver = WebDriver::new(launcher.server_url(), &config.capabilities())?;
    *driver.config_mut() = config.webdriver_config();

    driver.get("https://en.wikipedia.org")?;

    let search = driver.element(By::Name("search".to_string()));
    search.wait_for(Duration::from_secs(10)).displayed()?;
    search.send_keys("Selenium (software)")?;

    let go = driver.element(By::Css("button[type='submit']".to_string()));
    go.wait_for(Duration::from_secs(5)).enabled()?.click()?;

    let heading = driver.element(By::Id("firstHeading".to_string()));
    heading.wait_for(Duration::from_secs(10)).displayed()?;
    heading.assert_that().has_text("Selenium (software)")?;

    println!("page title: {}", driver.title()?);

    driver.quit()?;
    launcher.stop()?;
    Ok(())
}
