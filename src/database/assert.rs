use diesel::prelude::*;

use crate::error::ServiceError;

/// Generates `assert_<name>(conn, id)`, failing with NotFound when no row has that id.
macro_rules! assert_funcs {
    ( $( ( $name:ident, $table:ident ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                pub fn [<assert_ $name>](conn: &mut SqliteConnection, id: i32) -> Result<(), ServiceError> {
                    use crate::schema::$table;

                    let res = $table::table
                        .filter($table::id.eq(id))
                        .count()
                        .get_result::<i64>(conn)?;
                    if res == 0 {
                        return Err(ServiceError::not_found(format!(
                            "{} {}",
                            stringify!($name),
                            id
                        )));
                    }

                    Ok(())
                }
            }
        )+
    };
}

assert_funcs! {
    (patient, patients),
    (professional, professionals),
}
