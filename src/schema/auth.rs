//! Credential schemas: sign up, sign in and password change

use crate::constants::MIN_PASSWORD_LEN;
use crate::models::{ChangePasswordData, SignInData, SignUpData};
use crate::schema::{is_valid_email, min_len, required, Field, FieldErrors, Schema};

fn check_email(errors: &mut FieldErrors, email: &str) {
    if required(errors, Field::Email, email, "Email is required") && !is_valid_email(email) {
        errors.insert(Field::Email, "Invalid email");
    }
}

fn check_password(errors: &mut FieldErrors, field: Field, value: &str, missing: &str, short: &str) {
    if required(errors, field, value, missing) {
        min_len(errors, field, value, MIN_PASSWORD_LEN, short);
    }
}

impl Schema for SignUpData {
    type Output = SignUpData;

    fn validate(&self) -> Result<SignUpData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let short = "Password must be at least 6 characters";

        check_email(&mut errors, &self.email);
        check_password(&mut errors, Field::Password, &self.password, "Password is required", short);
        check_password(
            &mut errors,
            Field::ConfirmPassword,
            &self.confirm_password,
            "Please confirm your password",
            short,
        );

        // Equality is judged once the confirmation itself passes
        if !errors.contains(Field::ConfirmPassword) && self.password != self.confirm_password {
            errors.insert(Field::ConfirmPassword, "Passwords do not match");
        }

        errors.into_result(|| self.clone())
    }
}

impl Schema for SignInData {
    type Output = SignInData;

    fn validate(&self) -> Result<SignInData, FieldErrors> {
        let mut errors = FieldErrors::new();

        check_email(&mut errors, &self.email);
        check_password(
            &mut errors,
            Field::Password,
            &self.password,
            "Password is required",
            "Password must be at least 6 characters",
        );

        errors.into_result(|| self.clone())
    }
}

impl Schema for ChangePasswordData {
    type Output = ChangePasswordData;

    fn validate(&self) -> Result<ChangePasswordData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let short = "New password must be at least 6 characters";

        check_password(
            &mut errors,
            Field::NewPassword,
            &self.new_password,
            "New password is required",
            short,
        );
        check_password(
            &mut errors,
            Field::ConfirmNewPassword,
            &self.confirm_new_password,
            "Please confirm your new password",
            short,
        );

        if !errors.contains(Field::ConfirmNewPassword)
            && self.new_password != self.confirm_new_password
        {
            errors.insert(Field::ConfirmNewPassword, "New passwords do not match");
        }

        errors.into_result(|| self.clone())
    }
}
