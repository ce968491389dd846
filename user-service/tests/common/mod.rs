use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;
use user_service::domain::user::models::ListQuery;
use user_service::domain::user::models::NewUser;
use user_service::domain::user::models::SortField;
use user_service::domain::user::models::SortOrder;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserFilter;
use user_service::domain::user::models::UserId;
use user_service::domain::user::models::UserPage;
use user_service::domain::user::models::Username;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::ports::UserServicePort;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::user::errors::UserError;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server on a random port, backed by
/// an in-memory repository.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(repository));
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET.as_bytes(), 24));

        let application = create_router(user_service, Arc::clone(&authenticator));
        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user through the public endpoint.
    pub async fn register(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "fullname": format!("{} Fullname", username),
                "role": "user",
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in with matching Basic Auth header and body, returning the
    /// access token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .basic_auth(username, Some(password))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access_token")
            .to_string()
    }
}

/// HashMap-backed UserRepository for driving the HTTP surface without a
/// database.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn matches(user: &User, query: &ListQuery) -> bool {
    if let Some(keyword) = &query.keyword {
        let keyword = keyword.to_lowercase();
        let fullname = user.fullname.as_deref().unwrap_or("");
        let hit = user.username.as_str().to_lowercase().contains(&keyword)
            || fullname.to_lowercase().contains(&keyword)
            || user.role.as_str().contains(&keyword);
        if !hit {
            return false;
        }
    }

    query.filters.iter().all(|filter| match filter {
        UserFilter::Username(value) => user.username.as_str() == value,
        UserFilter::Fullname(value) => user.fullname.as_deref() == Some(value.as_str()),
        UserFilter::Role(value) => user.role.as_str() == value,
        UserFilter::IsActive(value) => user.is_active == *value,
    })
}

fn compare(a: &User, b: &User, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.0.cmp(&b.id.0),
        SortField::Username => a.username.as_str().cmp(b.username.as_str()),
        SortField::Fullname => a.fullname.cmp(&b.fullname),
        SortField::Role => a.role.as_str().cmp(b.role.as_str()),
        SortField::IsActive => a.is_active.cmp(&b.is_active),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let now = Utc::now();
        let user = User {
            id: UserId(id),
            username: user.username,
            password_hash: Some(user.password_hash),
            fullname: user.fullname,
            role: user.role,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<UserPage, UserError> {
        let users = self.users.lock().unwrap();

        let mut records: Vec<User> = users
            .values()
            .filter(|user| matches(user, query))
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_count = records.len() as i64;
        let records: Vec<User> = records
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page as usize)
            .collect();

        Ok(UserPage {
            records,
            total_count,
            page_count: UserPage::page_count_for(total_count, query.per_page),
        })
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|existing| existing.id != user.id && existing.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        match users.get_mut(&user.id.0) {
            Some(existing) => {
                let mut user = user;
                user.updated_at = Utc::now();
                *existing = user.clone();
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();

        match users.get_mut(&id.0) {
            Some(existing) => {
                existing.password_hash = Some(password_hash.to_string());
                existing.updated_at = Utc::now();
                Ok(())
            }
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        match self.users.lock().unwrap().remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}
