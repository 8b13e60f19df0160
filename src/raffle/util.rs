use once_cell::sync::Lazy;
use std::time::Instant;

// Reloj de la sesión ----
static START: Lazy<Instant> = Lazy::new(Instant::now);

/// Tiempo transcurrido desde el inicio del proceso (ms).
pub fn now_ms() -> u64 {
    START.elapsed().as_millis() as u64
}
