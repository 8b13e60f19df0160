// registry.rs - owner of the participant pool and the winner history
use crate::raffle::entities::{Participant, ParticipantId, WinnerRecord};
use crate::raffle::util;

/// Dueño del estado del sorteo: participantes activos e historial de
/// ganadores. Los dos conjuntos son disjuntos: al confirmar un ganador
/// (`commit`) el participante sale del grupo activo en el mismo paso.
#[derive(Debug, Default)]
pub struct Registry {
    participants: Vec<Participant>,
    winners: Vec<WinnerRecord>,
    next_id: ParticipantId,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            winners: Vec::new(),
            next_id: 0,
        }
    }

    /// Registra un participante nuevo.
    ///
    /// Devuelve `false` si ya existe otro participante activo con el mismo
    /// nombre (sin distinguir mayúsculas). Los nombres de ganadores pasados
    /// no cuentan.
    pub fn add(&mut self, name: &str, entries: u32) -> bool {
        if self.name_taken(name, None) {
            return false;
        }

        let p = Participant {
            id: self.next_id,
            name: name.to_string(),
            // si entries == 0, usar 1
            entries: entries.max(1),
        };
        self.next_id += 1;
        self.participants.push(p);
        true
    }

    /// Edita nombre y entradas de un participante activo.
    ///
    /// Devuelve `false` si el nuevo nombre choca con **otro** participante
    /// activo, o si el id no existe. Renombrarse a sí mismo con otras
    /// mayúsculas sí está permitido.
    pub fn update(&mut self, id: ParticipantId, name: &str, entries: u32) -> bool {
        if self.name_taken(name, Some(id)) {
            return false;
        }
        let Some(p) = self.participants.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        p.name = name.to_string();
        p.entries = entries.max(1);
        true
    }

    /// Elimina un participante del grupo activo, si existe.
    pub fn remove(&mut self, id: ParticipantId) {
        self.participants.retain(|p| p.id != id);
    }

    /// Confirma un ganador: lo saca del grupo activo y agrega **un** registro
    /// al historial con `order = largo anterior + 1`.
    ///
    /// Este es el paso explícito posterior a la selección: la animación
    /// conoce al ganador antes de terminar, pero el estado solo cambia aquí.
    pub fn commit(&mut self, id: ParticipantId) -> Result<WinnerRecord, &'static str> {
        let Some(pos) = self.participants.iter().position(|p| p.id == id) else {
            return Err("participant is not active");
        };
        let participant = self.participants.remove(pos);

        let record = WinnerRecord {
            participant,
            order: self.winners.len() as u32 + 1,
            timestamp_ms: util::now_ms(),
        };
        self.winners.push(record.clone());
        Ok(record)
    }

    /// Borra participantes e historial (el "reiniciar todo" de la interfaz).
    pub fn reset(&mut self) {
        self.participants.clear();
        self.winners.clear();
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    /// Suma de entradas del grupo activo.
    pub fn total_entries(&self) -> u64 {
        self.participants.iter().map(|p| p.entries as u64).sum()
    }

    /// Devuelve una copia del grupo activo para que la GUI pueda dibujar.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.clone()
    }

    pub fn print_state(&self) {
        let total = self.total_entries();
        println!("┌{}┐", "─".repeat(38));
        if self.participants.is_empty() {
            println!("│ {:<36} │", "(sin participantes)");
        }
        for p in &self.participants {
            let share = if total == 0 {
                0.0
            } else {
                p.entries as f64 / total as f64 * 100.0
            };
            let line = format!("{:<16} {:>4}  ({:>5.1}%)", p.name, p.entries, share);
            println!("│ {:<36} │", line);
        }
        println!("└{}┘", "─".repeat(38));
    }

    // ¿Hay otro participante activo con este nombre? `except` permite
    // excluir al propio participante durante una edición.
    fn name_taken(&self, name: &str, except: Option<ParticipantId>) -> bool {
        let lower = name.to_lowercase();
        self.participants
            .iter()
            .any(|p| Some(p.id) != except && p.name.to_lowercase() == lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rechaza_nombre_duplicado_sin_mayusculas() {
        let mut reg = Registry::new();
        assert!(reg.add("Alice", 5));
        assert!(!reg.add("alice", 2));
        assert_eq!(reg.participants().len(), 1);
        assert_eq!(reg.participants()[0].entries, 5);
    }

    #[test]
    fn add_normaliza_entries_cero() {
        let mut reg = Registry::new();
        assert!(reg.add("Ana", 0));
        assert_eq!(reg.participants()[0].entries, 1);
    }

    #[test]
    fn update_rechaza_choque_con_otro_pero_permite_recapitalizarse() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        reg.add("Beto", 2);
        let ana = reg.participants()[0].id;

        // chocar con Beto no se permite
        assert!(!reg.update(ana, "beto", 3));
        // cambiarse las mayúsculas a sí misma, sí
        assert!(reg.update(ana, "ANA", 3));
        assert_eq!(reg.participants()[0].name, "ANA");
        assert_eq!(reg.participants()[0].entries, 3);
    }

    #[test]
    fn update_con_id_inexistente_devuelve_false() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        assert!(!reg.update(999, "Otro", 2));
    }

    #[test]
    fn remove_saca_solo_al_indicado() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        reg.add("Beto", 2);
        let ana = reg.participants()[0].id;
        reg.remove(ana);
        assert_eq!(reg.participants().len(), 1);
        assert_eq!(reg.participants()[0].name, "Beto");
        // remover de nuevo no hace nada
        reg.remove(ana);
        assert_eq!(reg.participants().len(), 1);
    }

    #[test]
    fn commit_mueve_al_ganador_al_historial() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        reg.add("Beto", 2);
        let ana = reg.participants()[0].id;

        let record = reg.commit(ana).unwrap();
        assert_eq!(record.order, 1);
        assert_eq!(record.participant.name, "Ana");

        // disjuntos: Ana ya no está activa, y el historial tiene un registro
        assert!(reg.participants().iter().all(|p| p.id != ana));
        assert_eq!(reg.winners().len(), 1);

        // un nombre del historial puede volver a registrarse
        assert!(reg.add("Ana", 4));
    }

    #[test]
    fn commit_de_id_inactivo_falla() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        let ana = reg.participants()[0].id;
        reg.commit(ana).unwrap();
        assert!(reg.commit(ana).is_err());
    }

    #[test]
    fn tres_sorteos_seguidos_ordenan_1_2_3_y_vacian_el_grupo() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        reg.add("Beto", 2);
        reg.add("Carla", 3);

        for expected_order in 1..=3u32 {
            let winner = crate::raffle::selector::select(reg.participants())
                .unwrap()
                .clone();
            let record = reg.commit(winner.id).unwrap();
            assert_eq!(record.order, expected_order);
        }

        assert!(reg.participants().is_empty());
        assert_eq!(reg.winners().len(), 3);
    }

    #[test]
    fn reset_borra_participantes_e_historial() {
        let mut reg = Registry::new();
        reg.add("Ana", 1);
        let ana = reg.participants()[0].id;
        reg.commit(ana).unwrap();
        reg.add("Beto", 2);

        reg.reset();
        assert!(reg.participants().is_empty());
        assert!(reg.winners().is_empty());
        assert_eq!(reg.total_entries(), 0);
    }
}
