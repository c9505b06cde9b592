use trip_api::{MemberUpsert, TripMember};

use super::forms::{required, Form, FormError};

pub const MEMBER_USER_ID: usize = 0;
pub const MEMBER_ROLE: usize = 1;

const DEFAULT_ROLE: &str = "viewer";

pub fn new_member_form() -> Form {
    Form::new(&["User id", "Role"]).with_value(MEMBER_ROLE, DEFAULT_ROLE)
}

pub fn member_form_from(member: &TripMember) -> Form {
    new_member_form()
        .with_value(MEMBER_USER_ID, &member.user_id.to_string())
        .with_value(MEMBER_ROLE, &member.role)
}

pub fn member_upsert_from(form: &Form) -> Result<MemberUpsert, FormError> {
    let user_id = required(form, MEMBER_USER_ID)?
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(FormError::InvalidNumber("User id"))?;
    let role = required(form, MEMBER_ROLE)?.to_lowercase();
    Ok(MemberUpsert { user_id, role })
}

pub fn member_label(member: &TripMember) -> String {
    format!("User #{}", member.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_form_defaults_to_viewer() {
        let form = new_member_form().with_value(MEMBER_USER_ID, " 12 ");
        assert_eq!(
            member_upsert_from(&form),
            Ok(MemberUpsert {
                user_id: 12,
                role: "viewer".to_string(),
            })
        );
    }

    #[test]
    fn user_id_must_be_a_positive_number() {
        for raw in ["sam", "-3", "0"] {
            let form = new_member_form().with_value(MEMBER_USER_ID, raw);
            assert_eq!(
                member_upsert_from(&form),
                Err(FormError::InvalidNumber("User id"))
            );
        }
        assert_eq!(
            member_upsert_from(&new_member_form()),
            Err(FormError::Required("User id"))
        );
    }

    #[test]
    fn editing_keeps_the_user_and_role() {
        let member = TripMember {
            id: 4,
            trip_id: 3,
            user_id: 9,
            role: "editor".to_string(),
        };
        let form = member_form_from(&member);
        assert_eq!(form.value(MEMBER_USER_ID), "9");
        assert_eq!(member_upsert_from(&form).unwrap().role, "editor");
    }
}
