mod gui;

use std::sync::{Arc, Mutex};

use crate::gui::{run_gui, RaffleApp, SharedApp};

fn main() {
    // Crear el estado compartido del sorteo
    let state: SharedApp = Arc::new(Mutex::new(RaffleApp::new()));

    // Lanzar la GUI GTK
    run_gui(state);
}
