use crate::raffle::entities::{Participant, ParticipantId};

// =========================
// Constantes de la animación
// =========================

/// Duración total del giro (ms).
pub const SPIN_DURATION_MS: u64 = 4000;

/// Posición fija del puntero: 270° es "arriba" en el marco de dibujo
/// (eje y hacia abajo).
pub const POINTER_ANGLE_DEG: f64 = 270.0;

/// Vueltas completas extra antes de frenar. Son puramente cosméticas:
/// no cambian la alineación final módulo 360.
pub const FULL_TURNS: u32 = 5;

/// Intervalo entre ticks: `max(TICK_FLOOR_MS, TICK_BASE_MS * progreso)`.
pub const TICK_BASE_MS: f64 = 200.0;
pub const TICK_FLOOR_MS: f64 = 50.0;

// =========================
// Geometría de la rueda
// =========================

/// Lleva un ángulo en grados al rango [0, 360).
pub fn normalize_angle(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Ángulo (en grados) del centro de la porción del ganador, medido desde el
/// inicio de la rueda sin rotar. Las porciones son contiguas en orden de
/// registro, cada una de ancho `360 * entries / total`.
pub fn slice_center_angle(participants: &[Participant], winner_id: ParticipantId) -> Option<f64> {
    let total: u64 = participants.iter().map(|p| p.entries as u64).sum();
    if total == 0 {
        return None;
    }

    let mut cumulative = 0.0;
    for p in participants {
        let slice = p.entries as f64 / total as f64 * 360.0;
        if p.id == winner_id {
            return Some(cumulative + slice / 2.0);
        }
        cumulative += slice;
    }
    None
}

/// Rotación final que deja la porción del ganador centrada bajo el puntero,
/// con al menos `FULL_TURNS` vueltas completas desde la rotación actual.
pub fn compute_target_rotation(
    participants: &[Participant],
    winner_id: ParticipantId,
    current_rotation: f64,
) -> Option<f64> {
    let center = slice_center_angle(participants, winner_id)?;

    // En reposo la rueda debe quedar en (puntero - centro) módulo 360.
    let resting = POINTER_ANGLE_DEG - center;
    let mut target = f64::from(FULL_TURNS) * 360.0 + resting;
    while target < current_rotation + f64::from(FULL_TURNS) * 360.0 {
        target += 360.0;
    }
    Some(target)
}

/// Curva de frenado: `1 - (1 - p)^3`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

// =========================
// Giro en vuelo
// =========================

/// Lo que pasó en un frame del giro.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinFrame {
    /// Rotación absoluta interpolada (el host la guarda módulo 360).
    pub rotation: f64,
    /// Hubo que sonar un tick en este frame.
    pub tick: bool,
    /// El giro terminó en este frame. Se reporta exactamente una vez.
    pub completed: bool,
}

/// Estado transitorio de un giro en vuelo.
///
/// No posee reloj propio: `frame` recibe el tiempo transcurrido, así que en
/// pruebas se maneja con instantes elegidos a mano. El host llama `frame`
/// una vez por cuadro de dibujo; después de `cancel` (o del frame que
/// completó) ya no se emiten ticks ni completado.
#[derive(Debug)]
pub struct SpinAnimation {
    start_rotation: f64,
    target_rotation: f64,
    last_tick_ms: u64,
    completed: bool,
    cancelled: bool,
}

impl SpinAnimation {
    pub fn new(start_rotation: f64, target_rotation: f64) -> Self {
        Self {
            start_rotation,
            target_rotation,
            last_tick_ms: 0,
            completed: false,
            cancelled: false,
        }
    }

    /// Avanza el giro a `elapsed_ms` desde el arranque.
    pub fn frame(&mut self, elapsed_ms: u64) -> SpinFrame {
        let progress = (elapsed_ms as f64 / SPIN_DURATION_MS as f64).min(1.0);
        let eased = ease_out_cubic(progress);
        let rotation = self.start_rotation + (self.target_rotation - self.start_rotation) * eased;

        if self.cancelled || self.completed {
            return SpinFrame {
                rotation,
                tick: false,
                completed: false,
            };
        }

        // Chequeo perezoso una vez por frame: tick si pasó el intervalo.
        let mut tick = false;
        let interval = (TICK_BASE_MS * progress).max(TICK_FLOOR_MS);
        if elapsed_ms.saturating_sub(self.last_tick_ms) as f64 > interval {
            tick = true;
            self.last_tick_ms = elapsed_ms;
        }

        if progress >= 1.0 {
            self.completed = true;
            return SpinFrame {
                rotation: self.target_rotation,
                tick,
                completed: true,
            };
        }

        SpinFrame {
            rotation,
            tick,
            completed: false,
        }
    }

    /// Aborta el giro. Idempotente: llamadas repetidas no hacen nada, y
    /// ningún frame posterior emite tick ni completado.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_done(&self) -> bool {
        self.completed || self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn centro_de_porcion_acumula_las_anteriores() {
        // A ocupa [0°, 90°) y B ocupa [90°, 360°): centro de B = 225°.
        let participants = pool(&[("A", 1), ("B", 3)]);
        assert_eq!(slice_center_angle(&participants, 0), Some(45.0));
        assert_eq!(slice_center_angle(&participants, 1), Some(225.0));
        assert_eq!(slice_center_angle(&participants, 99), None);
    }

    #[test]
    fn target_alinea_el_centro_bajo_el_puntero_modulo_360() {
        let participants = pool(&[("A", 1), ("B", 3)]);
        // centro de B = 225° → reposo esperado = 270 - 225 = 45°.
        for current in [0.0, 45.0, 123.4, 359.9] {
            let target = compute_target_rotation(&participants, 1, current).unwrap();
            assert!((normalize_angle(target) - 45.0).abs() < 1e-9);
        }
    }

    #[test]
    fn target_da_al_menos_las_vueltas_completas() {
        let participants = pool(&[("A", 1), ("B", 3), ("C", 2)]);
        for current in [0.0, 180.0, 359.0] {
            for id in 0..3 {
                let target = compute_target_rotation(&participants, id, current).unwrap();
                assert!(target >= current + f64::from(FULL_TURNS) * 360.0);
            }
        }
    }

    #[test]
    fn target_none_sin_ganador_o_sin_entradas() {
        assert!(compute_target_rotation(&[], 0, 0.0).is_none());
        let participants = pool(&[("A", 1)]);
        assert!(compute_target_rotation(&participants, 7, 0.0).is_none());
    }

    #[test]
    fn easing_toca_los_extremos_exactos() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn la_rotacion_es_monotona_y_exacta_en_los_extremos() {
        let mut spin = SpinAnimation::new(100.0, 1900.0);

        assert_eq!(spin.frame(0).rotation, 100.0);

        let mut last = 100.0;
        for elapsed in (16..SPIN_DURATION_MS).step_by(16) {
            let frame = spin.frame(elapsed);
            assert!(frame.rotation >= last);
            last = frame.rotation;
        }

        let done = spin.frame(SPIN_DURATION_MS);
        assert!(done.completed);
        assert_eq!(done.rotation, 1900.0);
    }

    #[test]
    fn completado_se_reporta_exactamente_una_vez() {
        let mut spin = SpinAnimation::new(0.0, 1800.0);
        assert!(spin.frame(SPIN_DURATION_MS + 10).completed);
        assert!(spin.is_done());
        // frames posteriores mantienen la rotación final sin reemitir nada
        let after = spin.frame(SPIN_DURATION_MS + 500);
        assert!(!after.completed);
        assert!(!after.tick);
        assert_eq!(after.rotation, 1800.0);
    }

    #[test]
    fn los_ticks_se_van_espaciando_con_el_progreso() {
        let mut spin = SpinAnimation::new(0.0, 1800.0);
        let mut tick_times = Vec::new();
        for elapsed in (0..=SPIN_DURATION_MS).step_by(16) {
            if spin.frame(elapsed).tick {
                tick_times.push(elapsed);
            }
        }

        assert!(tick_times.len() > 10);
        let gaps: Vec<u64> = tick_times.windows(2).map(|w| w[1] - w[0]).collect();
        // el intervalo arranca en el piso de 50 ms y crece hacia 200 ms
        assert!(*gaps.first().unwrap() < *gaps.last().unwrap());
        for gap in &gaps {
            assert!(*gap >= TICK_FLOOR_MS as u64);
        }
    }

    #[test]
    fn cancelar_apaga_ticks_y_completado() {
        let mut spin = SpinAnimation::new(0.0, 1800.0);
        spin.frame(100);
        spin.cancel();
        spin.cancel(); // idempotente

        let frame = spin.frame(SPIN_DURATION_MS + 100);
        assert!(!frame.tick);
        assert!(!frame.completed);
        assert!(spin.is_done());
    }
}
