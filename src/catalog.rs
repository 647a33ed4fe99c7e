//! In-memory directory of rooms and nomis.
use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::{CreateNomi, Nomi, Room, UpdateNomi};

#[derive(Default)]
pub struct Catalog {
    rooms: RwLock<HashMap<String, Room>>,
    nomis: RwLock<HashMap<String, Nomi>>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    /* ---------- rooms ---------- */

    pub async fn create_room(&self, name: impl Into<String>) -> Room {
        let room = Room::new(name);
        self.rooms.write().await.insert(room.id.clone(), room.clone());
        room
    }

    pub async fn get_room(&self, id: &str) -> Option<Room> {
        self.rooms.read().await.get(id).cloned()
    }

    pub async fn room_exists(&self, id: &str) -> bool {
        self.rooms.read().await.contains_key(id)
    }

    /// Sorted by name, then id.
    pub async fn list_rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<_> = self.rooms.read().await.values().cloned().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        rooms
    }

    pub async fn room_count(&self) -> usize { self.rooms.read().await.len() }

    /* ---------- nomis ---------- */

    pub async fn create_nomi(&self, input: CreateNomi) -> Nomi {
        let nomi = Nomi::new(input.name, input.persona);
        self.nomis.write().await.insert(nomi.id.clone(), nomi.clone());
        nomi
    }

    pub async fn get_nomi(&self, id: &str) -> Option<Nomi> {
        self.nomis.read().await.get(id).cloned()
    }

    pub async fn list_nomis(&self) -> Vec<Nomi> {
        let mut nomis: Vec<_> = self.nomis.read().await.values().cloned().collect();
        nomis.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        nomis
    }

    pub async fn update_nomi(&self, id: &str, patch: UpdateNomi) -> Option<Nomi> {
        let mut nomis = self.nomis.write().await;
        let nomi = nomis.get_mut(id)?;
        if let Some(name) = patch.name {
            nomi.name = name;
        }
        if let Some(persona) = patch.persona {
            nomi.persona = persona;
        }
        Some(nomi.clone())
    }

    pub async fn delete_nomi(&self, id: &str) -> bool {
        self.nomis.write().await.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rooms_list_sorted() {
        let cat = Catalog::new();
        let b = cat.create_room("beta").await;
        let a = cat.create_room("alpha").await;
        assert!(cat.room_exists(&a.id).await);
        assert!(!cat.room_exists("missing").await);
        let names: Vec<_> = cat.list_rooms().await.into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["alpha", "beta"]);
        assert_eq!(cat.get_room(&b.id).await, Some(b.clone()));
        assert_eq!(cat.room_count().await, 2);
    }

    #[tokio::test]
    async fn nomi_update_and_delete() {
        let cat = Catalog::new();
        let nomi = cat
            .create_nomi(CreateNomi { name: "Echo".into(), persona: HashMap::new() })
            .await;

        let persona = HashMap::from([("mood".to_string(), "cheerful".to_string())]);
        let patch = UpdateNomi { name: None, persona: Some(persona.clone()) };
        let updated = cat.update_nomi(&nomi.id, patch).await.unwrap();
        assert_eq!(updated.name, "Echo");
        assert_eq!(updated.persona, persona);

        assert!(cat.update_nomi("missing", UpdateNomi::default()).await.is_none());
        assert!(cat.delete_nomi(&nomi.id).await);
        assert!(!cat.delete_nomi(&nomi.id).await);
        assert!(cat.get_nomi(&nomi.id).await.is_none());
        assert!(cat.list_nomis().await.is_empty());
    }
}
