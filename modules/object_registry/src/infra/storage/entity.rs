//! SeaORM entities for database tables

/// Regions table entity
pub mod region {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "regions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::object::Entity")]
        Objects,
    }

    impl Related<super::object::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Objects.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Resource types table entity
pub mod resource_type {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "resource_types")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::object::Entity")]
        Objects,
    }

    impl Related<super::object::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Objects.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Water types table entity
pub mod water_type {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "water_types")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::object::Entity")]
        Objects,
    }

    impl Related<super::object::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Objects.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Infrastructure objects table entity
pub mod object {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "objects")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub name: String,

        /// Foreign keys to the lookup tables (cascade on delete)
        pub region_id: i32,
        pub resource_type_id: i32,
        pub water_type_id: i32,

        pub fauna: bool,

        pub passport_date: Date,

        pub technical_condition: i32,

        #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
        pub latitude: Option<Decimal>,

        #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
        pub longitude: Option<Decimal>,

        /// Stored document name
        pub document: Option<String>,

        /// Cached priority score
        pub priority: i32,

        /// Creation timestamp
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::region::Entity",
            from = "Column::RegionId",
            to = "super::region::Column::Id",
            on_delete = "Cascade"
        )]
        Region,
        #[sea_orm(
            belongs_to = "super::resource_type::Entity",
            from = "Column::ResourceTypeId",
            to = "super::resource_type::Column::Id",
            on_delete = "Cascade"
        )]
        ResourceType,
        #[sea_orm(
            belongs_to = "super::water_type::Entity",
            from = "Column::WaterTypeId",
            to = "super::water_type::Column::Id",
            on_delete = "Cascade"
        )]
        WaterType,
        #[sea_orm(has_one = "super::priority_record::Entity")]
        PriorityRecord,
    }

    impl Related<super::region::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Region.def()
        }
    }

    impl Related<super::resource_type::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::ResourceType.def()
        }
    }

    impl Related<super::water_type::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::WaterType.def()
        }
    }

    impl Related<super::priority_record::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::PriorityRecord.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Priority records table entity, one row per object
pub mod priority_record {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "priority_records")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        /// Owning object; unique so concurrent upserts collapse into one row
        #[sea_orm(unique)]
        pub object_id: i32,

        pub score: i32,

        /// LOW, MEDIUM or HIGH
        pub level: String,

        pub formula_version: String,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::object::Entity",
            from = "Column::ObjectId",
            to = "super::object::Column::Id",
            on_delete = "Cascade"
        )]
        Object,
    }

    impl Related<super::object::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Object.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
