use rand::{thread_rng, Rng};

use crate::raffle::entities::Participant;

/// Sorteo ponderado por `entries`: la probabilidad de cada participante
/// es exactamente `entries / total`.
pub fn select(participants: &[Participant]) -> Option<&Participant> {
    select_with(participants, &mut thread_rng())
}

/// Igual que `select`, pero con un generador inyectado (útil para pruebas
/// y para el demo con semilla fija).
pub fn select_with<'a, R: Rng + ?Sized>(
    participants: &'a [Participant],
    rng: &mut R,
) -> Option<&'a Participant> {
    if participants.is_empty() {
        return None;
    }
    let total: u64 = participants.iter().map(|p| p.entries as u64).sum();
    if total == 0 {
        return None;
    }

    let roll = rng.gen_range(0.0..total as f64);
    pick_at(participants, roll)
}

/// Recorrido determinista: resta las entradas de cada participante al valor
/// sorteado y devuelve el primero donde el acumulado llega a <= 0.
///
/// Si el redondeo de punto flotante deja el valor positivo al final del
/// recorrido, se devuelve el último participante (nunca `None` con entrada
/// no vacía).
pub fn pick_at(participants: &[Participant], mut roll: f64) -> Option<&Participant> {
    for p in participants {
        roll -= p.entries as f64;
        if roll <= 0.0 {
            return Some(p);
        }
    }
    participants.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn pool(entries: &[(&str, u32)]) -> Vec<Participant> {
        entries
            .iter()
            .enumerate()
            .map(|(i, &(name, entries))| Participant {
                id: i as u64,
                name: name.to_string(),
                entries,
            })
            .collect()
    }

    #[test]
    fn select_vacio_devuelve_none() {
        assert!(select(&[]).is_none());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_with(&[], &mut rng).is_none());
    }

    #[test]
    fn select_siempre_devuelve_un_miembro() {
        let participants = pool(&[("Ana", 1), ("Beto", 3), ("Carla", 6)]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let winner = select_with(&participants, &mut rng).unwrap();
            assert!(participants.iter().any(|p| p.id == winner.id));
        }
    }

    #[test]
    fn roll_intermedio_cae_en_el_segundo() {
        // A ocupa [0, 1) y B ocupa [1, 4); un roll de 2.0 debe caer en B.
        let participants = pool(&[("A", 1), ("B", 3)]);
        let winner = pick_at(&participants, 2.0).unwrap();
        assert_eq!(winner.name, "B");
    }

    #[test]
    fn roll_cero_cae_en_el_primero() {
        let participants = pool(&[("A", 1), ("B", 3)]);
        assert_eq!(pick_at(&participants, 0.0).unwrap().name, "A");
    }

    #[test]
    fn redondeo_residual_cae_en_el_ultimo() {
        // Un roll que sobrevive al recorrido completo (solo posible por
        // redondeo) debe resolverse con el último, no con None.
        let participants = pool(&[("A", 1), ("B", 3)]);
        assert_eq!(pick_at(&participants, 4.5).unwrap().name, "B");
    }

    #[test]
    fn frecuencias_proporcionales_a_entries() {
        let participants = pool(&[("Ana", 1), ("Beto", 3)]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<String, u32> = HashMap::new();

        let draws = 20_000;
        for _ in 0..draws {
            let winner = select_with(&participants, &mut rng).unwrap();
            *counts.entry(winner.name.clone()).or_insert(0) += 1;
        }

        // Beto tiene 3 de 4 entradas: esperamos ~75% con margen de muestreo.
        let beto = counts["Beto"] as f64 / draws as f64;
        assert!((beto - 0.75).abs() < 0.02, "frecuencia de Beto: {beto}");
    }
}
