use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, IntoActiveModel,
};

use crate::{
    EngineError, NamedPatch, ResultEngine,
    repository::{Repository, SoftDelete},
    text::{normalize_name, normalize_text},
};

mod categories;
mod dishes;
mod food_tags;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of the catalogue: query and mutation services over the
/// injected repositories.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    dishes: Repository<crate::dishes::Entity>,
    categories: Repository<crate::categories::Entity>,
    food_tags: Repository<crate::food_tags::Entity>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The connection the engine runs on.
    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

/// Load the live row `id` or fail with `KeyNotFound`.
async fn require<E, C>(repo: &Repository<E>, db: &C, id: i32) -> ResultEngine<E::Model>
where
    E: SoftDelete + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    repo.find_by_id(db, id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("{} {id}", E::LABEL)))
}

async fn ensure_unique_name<E, C>(
    repo: &Repository<E>,
    db: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> ResultEngine<()>
where
    E: SoftDelete + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    if repo.exists_by_name(db, name, exclude_id).await? {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

/// Set `name` and its normalized twin on `active`.
fn set_name<E>(active: &mut E::ActiveModel, name: &str)
where
    E: SoftDelete,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    active.set(E::name_column(), name.into());
    active.set(E::name_norm_column(), normalize_text(name).into());
}

/// Insert a row of an entity that has nothing but the base fields and a name.
async fn create_named<E, C>(repo: &Repository<E>, db: &C, name: &str) -> ResultEngine<E::Model>
where
    E: SoftDelete + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    let name = normalize_name(name, E::LABEL)?;
    ensure_unique_name(repo, db, &name, None).await?;

    let mut active = <E::ActiveModel as ActiveModelTrait>::default();
    set_name::<E>(&mut active, &name);
    repo.create(db, active)
        .await
        .map_err(|err| EngineError::from_write(err, &name))
}

/// Apply a [`NamedPatch`] to the live row `id`.
async fn update_named<E, C>(
    repo: &Repository<E>,
    db: &C,
    id: i32,
    patch: NamedPatch,
) -> ResultEngine<E::Model>
where
    E: SoftDelete + 'static,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    require(repo, db, id).await?;

    let mut active = <E::ActiveModel as ActiveModelTrait>::default();
    let mut new_name = None;
    if let Some(name) = patch.name {
        let name = normalize_name(&name, E::LABEL)?;
        ensure_unique_name(repo, db, &name, Some(id)).await?;
        set_name::<E>(&mut active, &name);
        new_name = Some(name);
    }
    if let Some(is_active) = patch.is_active {
        active.set(E::is_active_column(), is_active.into());
    }

    repo.update(db, id, active)
        .await
        .map_err(|err| EngineError::from_write(err, new_name.as_deref().unwrap_or_default()))?
        .ok_or_else(|| EngineError::KeyNotFound(format!("{} {id}", E::LABEL)))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            dishes: Repository::new(),
            categories: Repository::new(),
            food_tags: Repository::new(),
        })
    }
}
