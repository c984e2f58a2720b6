use expense_desk::{Config, build_rocket};
use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("expense-desk: {}", err);
            std::process::exit(1);
        }
    };

    build_rocket(config)
}
