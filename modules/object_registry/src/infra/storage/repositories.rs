//! SeaORM repository implementations

use crate::contract::{
    InfrastructureObject, ObjectFields, PriorityLevel, PriorityRecord, ReferenceItem,
    ReferenceKind,
};
use crate::domain::repository::{ObjectRepository, PriorityRepository, ReferenceRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, sea_query::OnConflict, ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set,
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use super::entity::{object, priority_record};

/// Bind `$m` to the entity module of a reference kind and evaluate `$body`
macro_rules! with_reference_entity {
    ($kind:expr, $m:ident => $body:expr) => {
        match $kind {
            ReferenceKind::Region => {
                use $crate::infra::storage::entity::region as $m;
                $body
            }
            ReferenceKind::ResourceType => {
                use $crate::infra::storage::entity::resource_type as $m;
                $body
            }
            ReferenceKind::WaterType => {
                use $crate::infra::storage::entity::water_type as $m;
                $body
            }
        }
    };
}

// ===== Reference Repository =====

pub struct SeaOrmReferenceRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReferenceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceRepository for SeaOrmReferenceRepository {
    async fn create(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceItem> {
        let item: ReferenceItem = with_reference_entity!(kind, m => {
            m::ActiveModel {
                id: NotSet,
                name: Set(name.to_string()),
            }
            .insert(&*self.db)
            .await?
            .into()
        });
        Ok(item)
    }

    async fn find_by_id(&self, kind: ReferenceKind, id: i32) -> Result<Option<ReferenceItem>> {
        let item: Option<ReferenceItem> = with_reference_entity!(kind, m => {
            m::Entity::find_by_id(id).one(&*self.db).await?.map(Into::into)
        });
        Ok(item)
    }

    async fn list_all(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>> {
        let items: Vec<ReferenceItem> = with_reference_entity!(kind, m => {
            m::Entity::find()
                .order_by_asc(m::Column::Id)
                .all(&*self.db)
                .await?
                .into_iter()
                .map(Into::into)
                .collect()
        });
        Ok(items)
    }

    async fn rename(
        &self,
        kind: ReferenceKind,
        id: i32,
        name: &str,
    ) -> Result<Option<ReferenceItem>> {
        let item: Option<ReferenceItem> = with_reference_entity!(kind, m => {
            match m::Entity::find_by_id(id).one(&*self.db).await? {
                Some(model) => {
                    let mut active: m::ActiveModel = model.into();
                    active.name = Set(name.to_string());
                    Some(active.update(&*self.db).await?.into())
                }
                None => None,
            }
        });
        Ok(item)
    }

    async fn delete(&self, kind: ReferenceKind, id: i32) -> Result<bool> {
        let result = with_reference_entity!(kind, m => {
            m::Entity::delete_by_id(id).exec(&*self.db).await?
        });
        Ok(result.rows_affected > 0)
    }
}

// ===== Object Repository =====

pub struct SeaOrmObjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmObjectRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Copy writable fields onto an active model
fn apply_fields(active: &mut object::ActiveModel, fields: &ObjectFields) {
    active.name = Set(fields.name.clone());
    active.region_id = Set(fields.region_id);
    active.resource_type_id = Set(fields.resource_type_id);
    active.water_type_id = Set(fields.water_type_id);
    active.fauna = Set(fields.fauna);
    active.passport_date = Set(fields.passport_date);
    active.technical_condition = Set(fields.technical_condition);
    active.latitude = Set(fields.latitude);
    active.longitude = Set(fields.longitude);
    active.document = Set(fields.document.clone());
}

#[async_trait]
impl ObjectRepository for SeaOrmObjectRepository {
    async fn insert(&self, fields: &ObjectFields) -> Result<InfrastructureObject> {
        let mut active = object::ActiveModel {
            id: NotSet,
            priority: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        apply_fields(&mut active, fields);

        let model = active.insert(&*self.db).await?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, fields: &ObjectFields) -> Result<Option<InfrastructureObject>> {
        let Some(model) = object::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let mut active: object::ActiveModel = model.into();
        apply_fields(&mut active, fields);
        let model = active.update(&*self.db).await?;
        Ok(Some(model.into()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<InfrastructureObject>> {
        let result = object::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<InfrastructureObject>> {
        let results = object::Entity::find()
            .order_by_asc(object::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = object::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_priority(&self, id: i32, score: i32) -> Result<()> {
        object::Entity::update_many()
            .col_expr(object::Column::Priority, Expr::value(score))
            .filter(object::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;

        Ok(())
    }
}

// ===== Priority Repository =====

pub struct SeaOrmPriorityRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPriorityRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PriorityRepository for SeaOrmPriorityRepository {
    async fn upsert_for_object(
        &self,
        object_id: i32,
        score: i32,
        level: PriorityLevel,
        formula_version: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<PriorityRecord> {
        let active = priority_record::ActiveModel {
            id: NotSet,
            object_id: Set(object_id),
            score: Set(score),
            level: Set(level.as_str().to_string()),
            formula_version: Set(formula_version.to_string()),
            updated_at: Set(updated_at),
        };

        // Single statement keyed by the unique object_id column
        priority_record::Entity::insert(active)
            .on_conflict(
                OnConflict::column(priority_record::Column::ObjectId)
                    .update_columns([
                        priority_record::Column::Score,
                        priority_record::Column::Level,
                        priority_record::Column::FormulaVersion,
                        priority_record::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        self.find_by_object(object_id).await?.ok_or_else(|| {
            anyhow::anyhow!("priority record for object {} missing after upsert", object_id)
        })
    }

    async fn find_by_object(&self, object_id: i32) -> Result<Option<PriorityRecord>> {
        let result = priority_record::Entity::find()
            .filter(priority_record::Column::ObjectId.eq(object_id))
            .one(&*self.db)
            .await?;

        result.map(TryInto::try_into).transpose()
    }

    async fn list_all(&self) -> Result<Vec<PriorityRecord>> {
        let results = priority_record::Entity::find()
            .order_by_asc(priority_record::Column::ObjectId)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>>>()
    }
}
