//! User Model

use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    /// Lower-cased, unique, never changed after registration
    pub email: String,
    pub name: String,
    pub department: String,
    pub year: String,
    /// Argon2 PHC string
    #[serde(default, skip_serializing)]
    pub hashed_password: String,
    pub avatar: String,
    pub location: String,
    #[serde(rename = "joinedDate", alias = "joined_at")]
    pub joined_at: i64,
    pub rating: f64,
    pub total_sales: i64,
    pub total_purchases: i64,
    pub is_profile_complete: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// True iff name, department, year, location and avatar are all present
    pub fn compute_profile_complete(&self) -> bool {
        [
            &self.name,
            &self.department,
            &self.year,
            &self.location,
            &self.avatar,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            year: self.year.clone(),
            avatar: self.avatar.clone(),
            location: self.location.clone(),
            joined_at: self.joined_at,
            rating: self.rating,
            total_sales: self.total_sales,
            total_purchases: self.total_purchases,
            is_profile_complete: self.is_profile_complete,
        }
    }
}

/// Public profile (GET /api/users/profile)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: String,
    pub avatar: String,
    pub location: String,
    #[serde(rename = "joinedDate", alias = "joined_at")]
    pub joined_at: i64,
    pub rating: f64,
    pub total_sales: i64,
    pub total_purchases: i64,
    pub is_profile_complete: bool,
}

/// Register payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub year: String,
    pub avatar: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Session response for register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: String,
    pub avatar: String,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
            year: user.year.clone(),
            avatar: user.avatar.clone(),
            token,
        }
    }
}

/// Partial profile update; empty strings are treated as absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

/// Response for PUT /api/users/profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateResponse {
    pub success: bool,
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: String,
    pub avatar: String,
    pub location: String,
    pub is_profile_complete: bool,
    pub token: String,
}

impl ProfileUpdateResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            success: true,
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
            year: user.year.clone(),
            avatar: user.avatar.clone(),
            location: user.location.clone(),
            is_profile_complete: user.is_profile_complete,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "asha@college.edu".into(),
            name: "Asha Rao".into(),
            department: "Physics".into(),
            year: "2".into(),
            hashed_password: "$argon2id$secret".into(),
            avatar: "https://i.pravatar.cc/150?u=AshaRao".into(),
            location: "Campus".into(),
            joined_at: 0,
            rating: 5.0,
            total_sales: 0,
            total_purchases: 0,
            is_profile_complete: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_profile_complete_when_all_fields_present() {
        assert!(sample_user().compute_profile_complete());
    }

    #[test]
    fn test_profile_incomplete_on_blank_field() {
        let mut user = sample_user();
        user.department = "  ".into();
        assert!(!user.compute_profile_complete());
    }

    #[test]
    fn test_hashed_password_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert!(json.get("hashedPassword").is_none());
        assert_eq!(json["email"], "asha@college.edu");
    }

    #[test]
    fn test_profile_uses_client_field_names() {
        let json = serde_json::to_value(sample_user().profile()).unwrap();
        assert_eq!(json["_id"], 1);
        assert_eq!(json["joinedDate"], 0);
        assert_eq!(json["totalSales"], 0);
        assert_eq!(json["totalPurchases"], 0);
        assert_eq!(json["isProfileComplete"], false);
        assert!(json.get("id").is_none());
        assert!(json.get("total_sales").is_none());
    }
}
