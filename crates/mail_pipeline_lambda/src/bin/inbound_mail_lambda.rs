use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use chrono::Utc;
use lambda_runtime::{service_fn, Context, Error, LambdaEvent};
use mail_pipeline_lambda::adapters::completion::CapturedCompletion;
use mail_pipeline_lambda::adapters::logger::TracingLogger;
use mail_pipeline_lambda::adapters::notifier::{Notifier, OutboundEmail};
use mail_pipeline_lambda::adapters::object_store::ObjectStore;
use mail_pipeline_lambda::bundle::InvocationContext;
use mail_pipeline_lambda::error::HandlerError;
use mail_pipeline_lambda::handlers::inbound::{handle_inbound_event, Collaborators, Overrides};
use mail_pipeline_lambda::settings::{step_names_from_lookup, PipelineSettings};
use mail_pipeline_lambda::steps::default_registry;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

struct S3ObjectStore {
    s3_client: aws_sdk_s3::Client,
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn retrieve(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        let output = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| {
                format!(
                    "failed to read object s3://{bucket}/{key}: {}",
                    aws_sdk_s3::error::DisplayErrorContext(&error)
                )
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|error| format!("failed to read body of s3://{bucket}/{key}: {error}"))?;
        Ok(body.into_bytes().to_vec())
    }
}

struct SesNotifier {
    ses_client: aws_sdk_sesv2::Client,
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send_email(&self, email: &OutboundEmail) -> Result<String, String> {
        let subject = Content::builder()
            .data(&email.subject)
            .charset("UTF-8")
            .build()
            .map_err(|error| format!("invalid email subject: {error}"))?;
        let text = Content::builder()
            .data(&email.body_text)
            .charset("UTF-8")
            .build()
            .map_err(|error| format!("invalid email body: {error}"))?;
        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().text(text).build())
            .build();

        let output = self
            .ses_client
            .send_email()
            .from_email_address(&email.from)
            .destination(
                Destination::builder()
                    .set_to_addresses(Some(email.to.clone()))
                    .build(),
            )
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|error| {
                format!(
                    "failed to send email via ses: {}",
                    aws_sdk_sesv2::error::DisplayErrorContext(&error)
                )
            })?;
        Ok(output.message_id().unwrap_or_default().to_string())
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<(), Error> {
    let (payload, lambda_context) = event.into_parts();
    let lookup = |name: &str| std::env::var(name).ok();

    let settings = PipelineSettings::from_lookup(lookup);
    let overrides = Overrides {
        steps: step_names_from_lookup(lookup).map(|names| default_registry().resolve(names)),
        ..Overrides::default()
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let defaults = Collaborators {
        log: Arc::new(TracingLogger),
        ses: Arc::new(SesNotifier {
            ses_client: aws_sdk_sesv2::Client::new(&aws_config),
        }),
        s3: Arc::new(S3ObjectStore {
            s3_client: aws_sdk_s3::Client::new(&aws_config),
        }),
    };

    let completion = Arc::new(CapturedCompletion::default());
    handle_inbound_event(
        payload,
        invocation_context(&lambda_context),
        completion.clone(),
        Some(overrides),
        defaults,
        settings,
    )
    .await;

    lambda_outcome(completion.take())
}

fn invocation_context(context: &Context) -> InvocationContext {
    InvocationContext {
        request_id: context.request_id.clone(),
        invoked_function_arn: context.invoked_function_arn.clone(),
        deadline_ms: context.deadline,
        received_at: Utc::now().to_rfc3339(),
    }
}

fn lambda_outcome(outcome: Option<Result<(), HandlerError>>) -> Result<(), Error> {
    match outcome {
        Some(Ok(())) => Ok(()),
        Some(Err(error)) => Err(Error::from(error.to_string())),
        None => Err(Error::from("handler finished without reporting an outcome")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    lambda_runtime::run(service_fn(handle_request)).await
}
