use serde::Serialize;
use tracing::{info, warn};

use super::Portal;
use crate::api::{LoginRequest, RegisterRequest, RegisterResponse};
use crate::error::{PortalError, PortalResult, RequestError, ValidationError};
use crate::storage::UserInfo;

/// Registration form as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Account name
    pub username: String,
    /// Password
    pub password: String,
    /// Password again; must match
    pub confirm_password: String,
    /// Contact email
    pub email: String,
    /// Home region
    pub region: String,
    /// Products of interest; at least one
    pub trading_products: Vec<String>,
    /// Optional company name
    pub company_name: Option<String>,
}

impl RegistrationForm {
    /// Check the form and build the request body.
    ///
    /// Password confirmation is checked first, then the product selection,
    /// then the remaining required fields.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        let trading_products: Vec<String> = self
            .trading_products
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if trading_products.is_empty() {
            return Err(ValidationError::NoTradingProduct);
        }

        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("email", &self.email),
            ("region", &self.region),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            email: self.email.trim().to_string(),
            region: self.region.clone(),
            trading_products,
            company_name: self
                .company_name
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }
}

/// Choices offered on the registration page.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOptions {
    /// Region names
    pub regions: Vec<String>,
    /// Trading product names
    pub trading_products: Vec<String>,
}

impl Portal {
    /// Sign in and persist the returned token and profile.
    pub async fn login(&self, username: &str, password: &str) -> PortalResult<UserInfo> {
        if username.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "username".to_string(),
            }
            .into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField {
                field: "password".to_string(),
            }
            .into());
        }

        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.client.login(&request).await?;

        if !response.success {
            return Err(PortalError::Rejected {
                message: response.message.unwrap_or_else(|| "Login failed".to_string()),
            });
        }

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RequestError::Decode {
                message: "login response has no token".to_string(),
            })?;
        let user = response.user.ok_or_else(|| RequestError::Decode {
            message: "login response has no user".to_string(),
        })?;

        // Profile first: the token is what makes the session logged in.
        self.session.set_user_info(&user).await?;
        if let Err(e) = self.session.set_token(&token).await {
            if let Err(cleanup) = self.session.clear_user_info().await {
                warn!(error = %cleanup, "Failed to roll back stored profile");
            }
            return Err(e.into());
        }

        info!(
            username = %user.username,
            user_type = %user.user_type,
            "Login succeeded"
        );
        Ok(user)
    }

    /// Validate the form locally, then register. No request is sent when
    /// validation fails.
    pub async fn register(&self, form: &RegistrationForm) -> PortalResult<RegisterResponse> {
        let request = form.validate()?;
        let response = self.client.register(&request).await?;

        if !response.success {
            return Err(PortalError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            });
        }

        info!(username = %request.username, "Registration succeeded");
        Ok(response)
    }

    /// Regions and trading products for the registration form.
    pub async fn registration_options(&self) -> PortalResult<RegistrationOptions> {
        let regions = self.client.regions().await?.regions;
        let trading_products = self.client.trading_products().await?.products;

        Ok(RegistrationOptions {
            regions,
            trading_products,
        })
    }

    /// Forget the token and profile.
    pub async fn logout(&self) -> PortalResult<()> {
        self.session.clear_all().await?;
        info!("Logged out");
        Ok(())
    }
}
