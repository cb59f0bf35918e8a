use std::process;

mod error;
mod store;
mod task;
mod todo;
mod ui;

use store::TaskStore;
use todo::Todo;

const STORE_PATH: &str = "todo.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let store = match TaskStore::open(STORE_PATH) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let mut todo = Todo::new(store);
    ui::run_app(&mut todo)?;
    Ok(())
}
