use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ruleta::animation::{self, SpinAnimation, SPIN_DURATION_MS};
use ruleta::raffle::{selector, Registry};

fn main() {
    println!("========================================");
    println!("   DEMO RULETA: SELECCION + GIRO");
    println!("========================================\n");

    // 1) Registrar participantes con distintas entradas
    let mut registry = Registry::new();
    registry.add("Ana", 1);
    registry.add("Beto", 3);
    registry.add("Carla", 6);

    println!("Participantes registrados:");
    registry.print_state();

    println!("\n----------------------------------------");
    println!("FASE 1: Frecuencias del sorteo ponderado");
    println!("----------------------------------------");

    let mut rng = StdRng::seed_from_u64(2024);
    let mut counts: HashMap<String, u32> = HashMap::new();
    let draws = 5000;
    for _ in 0..draws {
        let winner = selector::select_with(registry.participants(), &mut rng).unwrap();
        *counts.entry(winner.name.clone()).or_insert(0) += 1;
    }

    let total = registry.total_entries();
    println!("Veces que salió elegido cada participante ({draws} sorteos):");
    for p in registry.participants() {
        let observed = counts.get(&p.name).copied().unwrap_or(0);
        let expected = p.entries as f64 / total as f64 * draws as f64;
        println!(
            "  {:<8} {:>5} veces (esperado ~{:.0})",
            p.name, observed, expected
        );
    }

    println!("\nSegún las entradas, esperamos que:");
    println!("  - Carla (6 de 10) salga alrededor del 60% de las veces.");
    println!("  - Ana (1 de 10) sea la menos frecuente.");

    println!("\n----------------------------------------");
    println!("FASE 2: Giro con reloj guiado");
    println!("----------------------------------------");

    let snapshot = registry.snapshot();
    let winner = selector::select_with(&snapshot, &mut rng).unwrap().clone();
    let target = animation::compute_target_rotation(&snapshot, winner.id, 0.0).unwrap();
    println!(
        "Ganador seleccionado: {} (objetivo {:.1}°)",
        winner.name, target
    );

    let mut spin = SpinAnimation::new(0.0, target);
    let mut ticks = 0;
    for elapsed in (0..=SPIN_DURATION_MS).step_by(250) {
        let frame = spin.frame(elapsed);
        if frame.tick {
            ticks += 1;
        }
        println!(
            "  t={:>4} ms  rotación {:>7.1}°{}",
            elapsed,
            frame.rotation,
            if frame.completed { "  << completado" } else { "" }
        );
    }
    println!("Ticks emitidos: {ticks}");
    println!(
        "Reposo final: {:.1}° (módulo 360)",
        animation::normalize_angle(target)
    );

    println!("\n----------------------------------------");
    println!("FASE 3: Tres sorteos confirmados");
    println!("----------------------------------------");

    while !registry.participants().is_empty() {
        let winner = selector::select_with(registry.participants(), &mut rng)
            .unwrap()
            .clone();
        let record = registry.commit(winner.id).unwrap();
        println!(
            "  {}º sorteo: {} ({} entradas)",
            record.order, record.participant.name, record.participant.entries
        );
    }

    println!(
        "\nGrupo activo vacío; historial con {} registros.",
        registry.winners().len()
    );
    println!("\nDemo terminada.");
}
