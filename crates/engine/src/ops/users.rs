use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, Condition, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{
    EngineError, NewUserCmd, ProfilePatch, ResultEngine, Role, User,
    pagination::{Page, PageMeta, PageRequest},
    query::like_ci,
    users,
    util::{
        normalize_email, normalize_optional_text, normalize_required_text, validate_email,
        validate_password,
    },
};

use super::{Engine, with_tx};

/// An account created at boot when demo seeding is enabled.
#[derive(Clone, Copy, Debug)]
pub struct DemoUser {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

pub const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        name: "John Admin",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
    },
    DemoUser {
        name: "Jane User",
        email: "user@example.com",
        password: "user123",
        role: Role::User,
    },
];

fn user_not_found() -> EngineError {
    EngineError::NotFound("User not found".to_string())
}

impl Engine {
    async fn find_user_by_email<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?)
    }

    /// Create an account from `cmd`, honoring its role.
    pub async fn create_user(&self, cmd: NewUserCmd) -> ResultEngine<User> {
        let name = normalize_required_text(&cmd.name, "Name")?;
        let email = normalize_email(&cmd.email);
        validate_email(&email)?;
        validate_password(&cmd.password)?;
        let password_hash = bcrypt::hash(&cmd.password, self.password_cost)?;

        with_tx!(self, |db_tx| {
            if self.find_user_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::DuplicateEmail("User already exists".to_string()));
            }
            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(password_hash),
                role: ActiveValue::Set(cmd.role.as_str().to_string()),
                avatar: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().trunc_subsecs(0)),
            }
            .insert(&db_tx)
            .await?;
            let user = User::try_from(model)?;
            tracing::info!(user = %user.id, role = user.role.as_str(), "user created");
            Ok(user)
        })
    }

    /// Self-service sign-up; always creates a regular user.
    pub async fn register(&self, cmd: NewUserCmd) -> ResultEngine<User> {
        self.create_user(cmd.role(Role::User)).await
    }

    /// Check an email/password pair. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = normalize_email(email);
        let Some(model) = self.find_user_by_email(&self.database, &email).await? else {
            return Err(EngineError::InvalidCredentials);
        };
        if !bcrypt::verify(password, &model.password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        User::try_from(model)
    }

    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(user_not_found)?;
        User::try_from(model)
    }

    /// Apply `patch` to the profile of `user_id`. Blank name/email are
    /// treated as absent.
    pub async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> ResultEngine<User> {
        let name = normalize_optional_text(patch.name.as_deref());
        let email = normalize_optional_text(patch.email.as_deref()).map(|e| normalize_email(&e));
        if let Some(email) = &email {
            validate_email(email)?;
        }

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(user_not_found)?;

            if let Some(email) = &email
                && *email != model.email
            {
                let taken = users::Entity::find()
                    .filter(users::Column::Email.eq(email.as_str()))
                    .filter(users::Column::Id.ne(model.id.as_str()))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if taken {
                    return Err(EngineError::DuplicateEmail("Email already in use".to_string()));
                }
            }

            let mut active: users::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(email) = email {
                active.email = ActiveValue::Set(email);
            }
            if let Some(avatar) = patch.avatar {
                active.avatar = ActiveValue::Set(normalize_optional_text(avatar.as_deref()));
            }
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Admin-only directory listing, newest first. `search` matches name or
    /// email case-insensitively.
    pub async fn list_users(
        &self,
        acting_role: Role,
        search: Option<&str>,
        page: PageRequest,
    ) -> ResultEngine<Page<User>> {
        if !acting_role.is_admin() {
            return Err(EngineError::Forbidden("Admin access required".to_string()));
        }

        let mut select = users::Entity::find();
        if let Some(needle) = normalize_optional_text(search).map(|s| s.to_lowercase()) {
            select = select.filter(
                Condition::any()
                    .add(like_ci(users::Column::Name, &needle))
                    .add(like_ci(users::Column::Email, &needle)),
            );
        }
        let total = select.clone().count(&self.database).await?;
        if page.is_past_end(total) {
            return Ok(Page::empty(page, total));
        }
        let models = select
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.database)
            .await?;
        let items = models
            .into_iter()
            .map(User::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(Page {
            items,
            meta: PageMeta::new(page, total),
        })
    }

    /// Replace the credential of the account registered under `email`.
    pub async fn reset_password(&self, email: &str, password: &str) -> ResultEngine<()> {
        validate_password(password)?;
        let email = normalize_email(email);
        let password_hash = bcrypt::hash(password, self.password_cost)?;

        with_tx!(self, |db_tx| {
            let model = self
                .find_user_by_email(&db_tx, &email)
                .await?
                .ok_or_else(user_not_found)?;
            let mut active: users::ActiveModel = model.into();
            active.password_hash = ActiveValue::Set(password_hash);
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Create the [`DEMO_USERS`] whose email is not registered yet. Returns
    /// how many were created.
    pub async fn seed_demo_users(&self) -> ResultEngine<usize> {
        let mut created = 0;
        for demo in DEMO_USERS {
            if self
                .find_user_by_email(&self.database, demo.email)
                .await?
                .is_some()
            {
                continue;
            }
            self.create_user(NewUserCmd::new(demo.name, demo.email, demo.password).role(demo.role))
                .await?;
            created += 1;
        }
        Ok(created)
    }
}
