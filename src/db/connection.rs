use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use tracing::info;

use crate::{
    config::StorageConfig,
    db::entities::todo_item::{PARTITION_KEY, SORT_KEY},
};

pub struct AwsClients {
    pub dynamodb: aws_sdk_dynamodb::Client,
    pub s3: aws_sdk_s3::Client,
}

pub async fn connect(cfg: &StorageConfig) -> anyhow::Result<AwsClients> {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let clients = build_clients(&sdk_config, cfg);

    if cfg.create_table_if_missing {
        ensure_table(&clients.dynamodb, &cfg.todos_table).await?;
    }

    Ok(clients)
}

fn build_clients(sdk_config: &SdkConfig, cfg: &StorageConfig) -> AwsClients {
    let mut dynamodb = aws_sdk_dynamodb::config::Builder::from(sdk_config);
    let mut s3 = aws_sdk_s3::config::Builder::from(sdk_config);

    if let Some(endpoint) = cfg.endpoint_url.as_deref() {
        info!(endpoint, "using custom storage endpoint");
        dynamodb = dynamodb.endpoint_url(endpoint);
        // Local S3 stand-ins rarely resolve virtual-hosted bucket names.
        s3 = s3.endpoint_url(endpoint).force_path_style(true);
    }

    AwsClients {
        dynamodb: aws_sdk_dynamodb::Client::from_conf(dynamodb.build()),
        s3: aws_sdk_s3::Client::from_conf(s3.build()),
    }
}

/// Creates the todos table (userId HASH, todoId RANGE) when it is absent.
pub async fn ensure_table(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
) -> anyhow::Result<()> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            info!(table_name, "table exists");
            return Ok(());
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|service| service.is_resource_not_found_exception()) => {}
        Err(err) => return Err(err.into()),
    }

    let attribute_definitions = vec![
        AttributeDefinition::builder()
            .attribute_name(PARTITION_KEY)
            .attribute_type(ScalarAttributeType::S)
            .build()?,
        AttributeDefinition::builder()
            .attribute_name(SORT_KEY)
            .attribute_type(ScalarAttributeType::S)
            .build()?,
    ];
    let key_schema = vec![
        KeySchemaElement::builder()
            .attribute_name(PARTITION_KEY)
            .key_type(KeyType::Hash)
            .build()?,
        KeySchemaElement::builder()
            .attribute_name(SORT_KEY)
            .key_type(KeyType::Range)
            .build()?,
    ];

    client
        .create_table()
        .table_name(table_name)
        .billing_mode(BillingMode::PayPerRequest)
        .set_attribute_definitions(Some(attribute_definitions))
        .set_key_schema(Some(key_schema))
        .send()
        .await?;
    info!(table_name, "table created");
    Ok(())
}
