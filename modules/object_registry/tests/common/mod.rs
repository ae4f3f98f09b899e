//! Shared fixtures: an in-memory store and service builders

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use object_registry::config::{Config, TabularFormat};
use object_registry::contract::*;
use object_registry::domain::repository::{
    ObjectRepository, PriorityRepository, ReferenceRepository,
};
use object_registry::domain::{FixedClock, Service};
use object_registry::infra::tabular::codec_set;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference date every test scores against
pub fn today() -> NaiveDate {
    date(2024, 6, 15)
}

#[derive(Default)]
struct State {
    next_id: i32,
    references: HashMap<(ReferenceKind, i32), ReferenceItem>,
    objects: BTreeMap<i32, InfrastructureObject>,
    priorities: BTreeMap<i32, PriorityRecord>,
}

impl State {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// One in-memory store backing all three repository traits, so reference
/// deletes can cascade the way foreign keys do
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    pub upserts: AtomicUsize,
    pub priority_writes: AtomicUsize,
    /// Makes `set_priority` fail, simulating a storage outage mid-save
    pub fail_priority_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn object_count(&self) -> usize {
        self.state.read().objects.len()
    }

    pub fn priority_count(&self) -> usize {
        self.state.read().priorities.len()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn priority_write_count(&self) -> usize {
        self.priority_writes.load(Ordering::SeqCst)
    }

    pub fn fail_priority_writes(&self, fail: bool) {
        self.fail_priority_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReferenceRepository for MemoryStore {
    async fn create(&self, kind: ReferenceKind, name: &str) -> anyhow::Result<ReferenceItem> {
        let mut state = self.state.write();
        let id = state.allocate_id();
        let item = ReferenceItem {
            id,
            name: name.to_string(),
        };
        state.references.insert((kind, id), item.clone());
        Ok(item)
    }

    async fn find_by_id(
        &self,
        kind: ReferenceKind,
        id: i32,
    ) -> anyhow::Result<Option<ReferenceItem>> {
        Ok(self.state.read().references.get(&(kind, id)).cloned())
    }

    async fn list_all(&self, kind: ReferenceKind) -> anyhow::Result<Vec<ReferenceItem>> {
        let mut items: Vec<ReferenceItem> = self
            .state
            .read()
            .references
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, item)| item.clone())
            .collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn rename(
        &self,
        kind: ReferenceKind,
        id: i32,
        name: &str,
    ) -> anyhow::Result<Option<ReferenceItem>> {
        let mut state = self.state.write();
        Ok(state.references.get_mut(&(kind, id)).map(|item| {
            item.name = name.to_string();
            item.clone()
        }))
    }

    async fn delete(&self, kind: ReferenceKind, id: i32) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        if state.references.remove(&(kind, id)).is_none() {
            return Ok(false);
        }
        let doomed: Vec<i32> = state
            .objects
            .values()
            .filter(|o| match kind {
                ReferenceKind::Region => o.region_id == id,
                ReferenceKind::ResourceType => o.resource_type_id == id,
                ReferenceKind::WaterType => o.water_type_id == id,
            })
            .map(|o| o.id)
            .collect();
        for object_id in doomed {
            state.objects.remove(&object_id);
            state.priorities.remove(&object_id);
        }
        Ok(true)
    }
}

fn apply(object: &mut InfrastructureObject, fields: &ObjectFields) {
    object.name = fields.name.clone();
    object.region_id = fields.region_id;
    object.resource_type_id = fields.resource_type_id;
    object.water_type_id = fields.water_type_id;
    object.fauna = fields.fauna;
    object.passport_date = fields.passport_date;
    object.technical_condition = fields.technical_condition;
    object.latitude = fields.latitude;
    object.longitude = fields.longitude;
    object.document = fields.document.clone();
}

#[async_trait]
impl ObjectRepository for MemoryStore {
    async fn insert(&self, fields: &ObjectFields) -> anyhow::Result<InfrastructureObject> {
        let mut state = self.state.write();
        let id = state.allocate_id();
        let mut object = InfrastructureObject {
            id,
            name: String::new(),
            region_id: 0,
            resource_type_id: 0,
            water_type_id: 0,
            fauna: false,
            passport_date: fields.passport_date,
            technical_condition: 0,
            latitude: None,
            longitude: None,
            document: None,
            priority: 0,
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap(),
        };
        apply(&mut object, fields);
        state.objects.insert(id, object.clone());
        Ok(object)
    }

    async fn update(
        &self,
        id: i32,
        fields: &ObjectFields,
    ) -> anyhow::Result<Option<InfrastructureObject>> {
        let mut state = self.state.write();
        Ok(state.objects.get_mut(&id).map(|object| {
            apply(object, fields);
            object.clone()
        }))
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<InfrastructureObject>> {
        Ok(self.state.read().objects.get(&id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<InfrastructureObject>> {
        Ok(self.state.read().objects.values().cloned().collect())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        state.priorities.remove(&id);
        Ok(state.objects.remove(&id).is_some())
    }

    async fn set_priority(&self, id: i32, score: i32) -> anyhow::Result<()> {
        self.priority_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_priority_writes.load(Ordering::SeqCst) {
            anyhow::bail!("priority column unavailable");
        }
        if let Some(object) = self.state.write().objects.get_mut(&id) {
            object.priority = score;
        }
        Ok(())
    }
}

#[async_trait]
impl PriorityRepository for MemoryStore {
    async fn upsert_for_object(
        &self,
        object_id: i32,
        score: i32,
        level: PriorityLevel,
        formula_version: &str,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<PriorityRecord> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        let id = match state.priorities.get(&object_id) {
            Some(existing) => existing.id,
            None => state.allocate_id(),
        };
        let record = PriorityRecord {
            id,
            object_id,
            score,
            level,
            formula_version: formula_version.to_string(),
            updated_at,
        };
        state.priorities.insert(object_id, record.clone());
        Ok(record)
    }

    async fn find_by_object(&self, object_id: i32) -> anyhow::Result<Option<PriorityRecord>> {
        Ok(self.state.read().priorities.get(&object_id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<PriorityRecord>> {
        Ok(self.state.read().priorities.values().cloned().collect())
    }
}

pub fn service_with(store: &Arc<MemoryStore>, config: &Config) -> Service {
    Service::new(
        store.clone(),
        store.clone(),
        store.clone(),
        codec_set(config.export_format),
        Arc::new(FixedClock(today())),
        config,
    )
}

pub fn service(store: &Arc<MemoryStore>) -> Service {
    service_with(store, &Config::default())
}

pub fn csv_service(store: &Arc<MemoryStore>) -> Service {
    let config = Config {
        export_format: TabularFormat::Csv,
        ..Config::default()
    };
    service_with(store, &config)
}

/// Ids of one region, resource type and water type
#[derive(Debug, Clone, Copy)]
pub struct Refs {
    pub region: i32,
    pub resource_type: i32,
    pub water_type: i32,
}

pub async fn seed_references(service: &Service) -> Refs {
    Refs {
        region: service
            .create_reference(ReferenceKind::Region, "Almaty region")
            .await
            .unwrap()
            .id,
        resource_type: service
            .create_reference(ReferenceKind::ResourceType, "Reservoir")
            .await
            .unwrap()
            .id,
        water_type: service
            .create_reference(ReferenceKind::WaterType, "Fresh")
            .await
            .unwrap()
            .id,
    }
}

pub fn fields(refs: Refs, name: &str, condition: i32, passport_date: NaiveDate) -> ObjectFields {
    ObjectFields {
        name: name.to_string(),
        region_id: refs.region,
        resource_type_id: refs.resource_type,
        water_type_id: refs.water_type,
        fauna: true,
        passport_date,
        technical_condition: condition,
        latitude: None,
        longitude: None,
        document: None,
    }
}
