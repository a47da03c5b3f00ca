//! Persona presets and the in-memory per-user assignment.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fixed persona presets applied on top of the base system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Analyst,
    Translator,
    Coder,
}

impl Persona {
    /// Parses a user-supplied persona name; `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "analyst" | "аналитик" => Some(Self::Analyst),
            "translator" | "переводчик" => Some(Self::Translator),
            "coder" | "программист" => Some(Self::Coder),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::Translator => "translator",
            Self::Coder => "coder",
        }
    }

    /// Instruction appended to the system message while the persona is active.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Analyst => {
                "Ты аналитик: разбирай вопрос по пунктам, выделяй факты, риски и выводы."
            }
            Self::Translator => {
                "Ты переводчик: переводи входящий текст между русским и английским, сохраняя смысл и тон, без пояснений."
            }
            Self::Coder => {
                "Ты программист: отвечай кодом с минимальными пояснениями, указывай язык и учитывай крайние случаи."
            }
        }
    }
}

/// In-memory `user_id → persona` assignment; not persisted by design of the
/// data model (cleared on restart).
#[derive(Debug, Clone, Default)]
pub struct PersonaStore {
    assignments: Arc<RwLock<HashMap<i64, Persona>>>,
}

impl PersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, user_id: i64, persona: Persona) {
        self.assignments.write().await.insert(user_id, persona);
    }

    pub async fn get(&self, user_id: i64) -> Option<Persona> {
        self.assignments.read().await.get(&user_id).copied()
    }

    pub async fn clear(&self, user_id: i64) {
        self.assignments.write().await.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_names_case_insensitively() {
        assert_eq!(Persona::parse("Translator"), Some(Persona::Translator));
        assert_eq!(Persona::parse("аналитик"), Some(Persona::Analyst));
        assert_eq!(Persona::parse("poet"), None);
    }

    #[tokio::test]
    async fn set_get_clear_roundtrip() {
        let store = PersonaStore::new();
        assert_eq!(store.get(7).await, None);

        store.set(7, Persona::Coder).await;
        assert_eq!(store.get(7).await, Some(Persona::Coder));

        store.clear(7).await;
        assert_eq!(store.get(7).await, None);
    }
}
