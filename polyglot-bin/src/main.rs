// A few rules of thumb.
// Use request guard whenever possible to let rocket simplify the boilerplate of the otherwise complicated flow control.
// Culture resolution and preference handling live in polyglot-core, this crate only adapts them to Rocket.
// Never redirect to anything the preference handler didn't hand back, it already filtered out foreign targets.

#[macro_use]
extern crate rocket;

use rocket::{
    figment::{
        providers::{Format, Toml},
        Figment,
    },
    shield::Shield,
    Build, Rocket,
};
use std::path::PathBuf;
use structopt::StructOpt;

mod infras;
mod pages;
mod services;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "polyglot-bin",
    about = "A localized web server that negotiates request cultures and remembers language choices"
)]
struct PolyglotOpts {
    /// Path to the TOML configuration file.
    #[structopt(short, long, parse(from_os_str))]
    config: PathBuf,
}

pub fn build(figment: Figment) -> Rocket<Build> {
    use infras::i18n::Localization;

    rocket::custom(figment)
        .attach(Shield::new())
        .attach(Localization::fairing())
        .mount(
            "/",
            routes![
                pages::basics::index,
                pages::basics::privacy,
                pages::basics::cultures,
                pages::basics::strings
            ],
        )
        .mount("/language", routes![services::i18n::set_culture])
}

#[launch]
fn rocket() -> Rocket<Build> {
    let args: PolyglotOpts = PolyglotOpts::from_args();

    // This helps us manage run-time configuration easily
    let figment = Figment::from(rocket::Config::default()).merge(Toml::file(args.config).nested());

    build(figment)
}
