use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_users_table::Migration),
            Box::new(m20240115_000002_create_suppliers_table::Migration),
            Box::new(m20240115_000003_create_inventory_items_table::Migration),
            Box::new(m20240115_000004_create_alerts_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240115_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedBy).uuid().null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_role")
                        .table(Users::Table)
                        .col(Users::Role)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Role,
        IsActive,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240115_000002_create_suppliers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000002_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().not_null())
                        .col(ColumnDef::new(Suppliers::Email).string().not_null())
                        .col(ColumnDef::new(Suppliers::Phone).string().not_null())
                        .col(ColumnDef::new(Suppliers::AddressStreet).string().null())
                        .col(ColumnDef::new(Suppliers::AddressCity).string().null())
                        .col(ColumnDef::new(Suppliers::AddressState).string().null())
                        .col(ColumnDef::new(Suppliers::AddressZip).string().null())
                        .col(ColumnDef::new(Suppliers::AddressCountry).string().null())
                        .col(ColumnDef::new(Suppliers::Category).string().not_null())
                        .col(
                            ColumnDef::new(Suppliers::Rating)
                                .integer()
                                .not_null()
                                .default(3),
                        )
                        .col(
                            ColumnDef::new(Suppliers::PaymentTerms)
                                .string()
                                .not_null()
                                .default("NET30"),
                        )
                        .col(
                            ColumnDef::new(Suppliers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Suppliers::Notes).text().null())
                        .col(ColumnDef::new(Suppliers::CreatedBy).uuid().null())
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_suppliers_name")
                        .table(Suppliers::Table)
                        .col(Suppliers::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_suppliers_category")
                        .table(Suppliers::Table)
                        .col(Suppliers::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        Name,
        ContactPerson,
        Email,
        Phone,
        AddressStreet,
        AddressCity,
        AddressState,
        AddressZip,
        AddressCountry,
        Category,
        Rating,
        PaymentTerms,
        IsActive,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240115_000003_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000003_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Weak reference to suppliers on purpose: deleting a supplier
            // leaves its items in place.
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::Description).text().null())
                        .col(ColumnDef::new(InventoryItems::Category).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::SupplierId).uuid().not_null())
                        .col(ColumnDef::new(InventoryItems::Location).string().null())
                        .col(ColumnDef::new(InventoryItems::UpdatedBy).uuid().null())
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_category")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Category)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_supplier_id")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_updated_at")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::UpdatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        Name,
        Sku,
        Description,
        Category,
        Quantity,
        ReorderLevel,
        UnitPrice,
        SupplierId,
        Location,
        UpdatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240115_000004_create_alerts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000004_create_alerts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Alerts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Alerts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Alerts::AlertType).string().not_null())
                        .col(ColumnDef::new(Alerts::Title).string().not_null())
                        .col(ColumnDef::new(Alerts::Message).string().not_null())
                        .col(
                            ColumnDef::new(Alerts::Severity)
                                .string()
                                .not_null()
                                .default("medium"),
                        )
                        .col(
                            ColumnDef::new(Alerts::IsRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Alerts::IsResolved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Alerts::RelatedItem).uuid().null())
                        .col(ColumnDef::new(Alerts::RelatedSupplier).uuid().null())
                        .col(ColumnDef::new(Alerts::AssignedTo).json().null())
                        .col(ColumnDef::new(Alerts::ResolvedBy).uuid().null())
                        .col(ColumnDef::new(Alerts::ResolvedAt).timestamp().null())
                        .col(ColumnDef::new(Alerts::ExpiresAt).timestamp().null())
                        .col(ColumnDef::new(Alerts::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Alerts::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // Probe index for the duplicate-alert check
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_alerts_type_item_resolved")
                        .table(Alerts::Table)
                        .col(Alerts::AlertType)
                        .col(Alerts::RelatedItem)
                        .col(Alerts::IsResolved)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_alerts_created_at")
                        .table(Alerts::Table)
                        .col(Alerts::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Alerts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Alerts {
        Table,
        Id,
        AlertType,
        Title,
        Message,
        Severity,
        IsRead,
        IsResolved,
        RelatedItem,
        RelatedSupplier,
        AssignedTo,
        ResolvedBy,
        ResolvedAt,
        ExpiresAt,
        CreatedAt,
        UpdatedAt,
    }
}
