use crate::schema::{DefaultValue, Field, Migration, Operation};

pub static MIGRATION: Migration = Migration {
    app: "jobs",
    name: "0001_initial",
    dependencies: &[],
    operations: &[
        Operation::CreateModel {
            model: "farmnode",
            fields: &[
                Field::auto("id"),
                Field::char("ip_address", 32),
                Field::char("machine_name", 128),
                Field::char("status", 32).default(DefaultValue::Text("offline")),
                Field::datetime("last_seen").null(),
            ],
        },
        Operation::CreateModel {
            model: "farmjob",
            fields: &[
                Field::auto("id"),
                Field::char("job_class", 128),
                Field::datetime("created").default(DefaultValue::CurrentTimestamp),
                Field::datetime("modified").default(DefaultValue::CurrentTimestamp),
                Field::char("status", 32).default(DefaultValue::Text("ready")),
                Field::datetime("start_time").null(),
                Field::datetime("end_time").null(),
            ],
        },
    ],
};
