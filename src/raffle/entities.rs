// entities.rs - very small types

/// Identificador lógico de un participante dentro del registro.
pub type ParticipantId = u64;

/// Un participante activo del sorteo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Cantidad de entradas (boletos). Siempre >= 1.
    pub entries: u32,
}

/// Resultado de un sorteo ya confirmado. Inmutable una vez creado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerRecord {
    /// Copia del participante al momento de ganar.
    pub participant: Participant,
    /// Número de sorteo, empezando en 1.
    pub order: u32,
    /// Milisegundos desde el arranque del proceso.
    pub timestamp_ms: u64,
}
