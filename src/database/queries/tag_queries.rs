use crate::database::DatabaseConnection;
use crate::domain::NewTag;
use crate::models::{NewTagEntry, Tag};
use crate::schema::tags;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

#[tracing::instrument(name = "List tags", skip(connection))]
pub async fn list_tags(
    connection: &mut DatabaseConnection,
) -> Result<Vec<Tag>, diesel::result::Error> {
    tags::table
        .order(tags::id)
        .select(Tag::as_select())
        .load(connection)
        .await
}

#[tracing::instrument(name = "Get tag", skip(connection))]
pub async fn get_tag(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<Option<Tag>, diesel::result::Error> {
    tags::table
        .find(id)
        .select(Tag::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Insert tag", skip(connection, tag), fields(slug = %tag.slug.as_ref()))]
pub async fn insert_tag(
    connection: &mut DatabaseConnection,
    tag: &NewTag,
) -> Result<Tag, diesel::result::Error> {
    diesel::insert_into(tags::table)
        .values(&NewTagEntry {
            name: &tag.name,
            color: tag.color.as_ref(),
            slug: tag.slug.as_ref(),
        })
        .returning(Tag::as_returning())
        .get_result(connection)
        .await
}
