//! In-process school storage for tests and throwaway runs

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{NewSchool, School, SchoolStore};
use crate::geo::GeoPoint;

#[derive(Default)]
pub struct MemorySchoolStore {
    schools: RwLock<Vec<School>>,
}

impl MemorySchoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.schools.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.schools.read().await.is_empty()
    }
}

#[async_trait]
impl SchoolStore for MemorySchoolStore {
    async fn list_coordinates(&self) -> Result<Vec<GeoPoint>> {
        Ok(self.schools.read().await.iter().map(School::location).collect())
    }

    async fn list_all(&self) -> Result<Vec<School>> {
        Ok(self.schools.read().await.clone())
    }

    async fn insert(&self, school: &NewSchool) -> Result<i64> {
        let mut schools = self.schools.write().await;
        let id = schools.last().map_or(1, |s| s.id + 1);
        schools.push(school.clone().into_school(id));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_sequential() -> Result<()> {
        let store = MemorySchoolStore::new();
        assert!(store.is_empty().await);

        let school = NewSchool {
            name: "North".to_string(),
            address: "1 Pole Rd".to_string(),
            location: GeoPoint::new(89.0, 0.0),
        };
        assert_eq!(store.insert(&school).await?, 1);
        assert_eq!(store.insert(&school).await?, 2);
        assert_eq!(store.len().await, 2);

        let ids: Vec<i64> = store.list_all().await?.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.list_coordinates().await?, vec![GeoPoint::new(89.0, 0.0); 2]);
        Ok(())
    }
}
