//! End-to-end activation against serverless documents.
//!
//! Loads a full service description, runs the activation hook and checks
//! the rewritten configuration.
#![cfg(feature = "yaml")]

use localrefs::resolve::{Severity, check_service, codes, index_warnings};
use localrefs::{
    Activation, ActivationOptions, LOCAL_STAGE, LocalEndpoint, LocalRefs, RefExpr, ResolveError,
    ResolvedIndex, Service,
};

const SERVICE: &str = r#"
service: orders
plugins:
  - serverless-localstack-refs

provider:
  name: aws
  runtime: nodejs20.x
  environment:
    STAGE: !Ref Stage
    QUEUE_ARN: !GetAtt MyQueue.Arn
    LOG_LEVEL: info

functions:
  worker:
    handler: src/worker.handler
    environment:
      QUEUE_URL:
        Ref: MyQueue
      TOPIC_ARN: !Ref Notifications
      TABLE: !Ref Orders
    events:
      - sqs:
          arn: !GetAtt MyQueue.Arn
          batchSize: 10
      - sns: !Ref Notifications
  api:
    handler: src/api.handler
    environment:
      BUCKET: !Ref Uploads
      GREETING: !Sub "hello-${Stage}"
    events:
      - http:
          path: /orders
          method: post

resources:
  Parameters:
    Stage:
      Type: String
      Default: dev
  Resources:
    MyQueue:
      Type: AWS::SQS::Queue
      Properties:
        QueueName: MyQueue
    Notifications:
      Type: AWS::SNS::Topic
      Properties:
        TopicName: notifications
    Uploads:
      Type: AWS::S3::Bucket
      Properties:
        BucketName: uploads
    Orders:
      Type: AWS::DynamoDB::Table
      Properties:
        TableName: orders
    WorkerRole:
      Type: AWS::IAM::Role
"#;

fn activate(source: &str, options: &ActivationOptions) -> (Service, Result<Activation, ResolveError>) {
    let mut service = Service::from_yaml_str(source).unwrap();
    let outcome = LocalRefs::from_service(&service)
        .unwrap()
        .initialize(options, &mut service);
    (service, outcome)
}

#[test]
fn test_stage_and_queue_scenario() {
    let (service, outcome) = activate(SERVICE, &ActivationOptions::for_stage(LOCAL_STAGE));

    assert!(matches!(outcome, Ok(Activation::Resolved { .. })));
    let env = &service.provider.environment;
    assert_eq!(env["STAGE"].as_str(), Some("dev"));
    assert_eq!(
        env["QUEUE_ARN"].as_str(),
        Some("arn:aws:sqs:us-east-1:000000000000:MyQueue")
    );
    assert_eq!(env["LOG_LEVEL"].as_str(), Some("info"));
}

#[test]
fn test_function_surfaces_are_rewritten() {
    let (service, outcome) = activate(SERVICE, &ActivationOptions::for_stage(LOCAL_STAGE));

    // provider: 2, worker: 3 env + 2 events, api: 1 env
    assert_eq!(outcome, Ok(Activation::Resolved { rewritten: 8 }));

    let worker = &service.functions["worker"];
    assert_eq!(
        worker.environment["QUEUE_URL"].as_str(),
        Some("http://localhost:4566/000000000000/MyQueue")
    );
    assert_eq!(
        worker.environment["TOPIC_ARN"].as_str(),
        Some("arn:aws:sns:us-east-1:000000000000:notifications")
    );
    assert_eq!(worker.environment["TABLE"].as_str(), Some("orders"));
    assert_eq!(
        worker.events[0].arn().and_then(RefExpr::as_str),
        Some("arn:aws:sqs:us-east-1:000000000000:MyQueue")
    );
    assert_eq!(
        worker.events[1].arn().and_then(RefExpr::as_str),
        Some("arn:aws:sns:us-east-1:000000000000:notifications")
    );

    let api = &service.functions["api"];
    assert_eq!(api.environment["BUCKET"].as_str(), Some("uploads"));
    assert!(api.environment["GREETING"].as_literal().is_some_and(|v| v.is_object()));
}

#[test]
fn test_resolved_document_keeps_everything_else() {
    let (service, _) = activate(SERVICE, &ActivationOptions::for_stage(LOCAL_STAGE));
    let value = serde_json::to_value(&service).unwrap();

    assert_eq!(value["service"], "orders");
    assert_eq!(value["provider"]["runtime"], "nodejs20.x");
    assert_eq!(value["functions"]["worker"]["events"][0]["sqs"]["batchSize"], 10);
    assert_eq!(value["functions"]["api"]["events"][0]["http"]["path"], "/orders");
    assert_eq!(
        value["resources"]["Resources"]["WorkerRole"]["Type"],
        "AWS::IAM::Role"
    );
}

#[test]
fn test_non_local_stage_passes_through() {
    let original = Service::from_yaml_str(SERVICE).unwrap();
    let (service, outcome) = activate(SERVICE, &ActivationOptions::for_stage("prod"));

    assert_eq!(outcome, Ok(Activation::Skipped));
    assert_eq!(service, original);
}

#[test]
fn test_selected_function_only() {
    let options = ActivationOptions::for_stage(LOCAL_STAGE).with_function("api");
    let (service, outcome) = activate(SERVICE, &options);

    // provider: 2, api: 1
    assert_eq!(outcome, Ok(Activation::Resolved { rewritten: 3 }));
    assert_eq!(
        service.functions["worker"].environment["QUEUE_URL"],
        RefExpr::reference("MyQueue")
    );
}

#[test]
fn test_activation_is_deterministic() {
    let options = ActivationOptions::for_stage(LOCAL_STAGE);
    let (first, _) = activate(SERVICE, &options);
    let (second, _) = activate(SERVICE, &options);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_custom_endpoint_block() {
    let source = format!(
        "{}\ncustom:\n  localstack:\n    host: localstack:4566\n    region: eu-west-1\n",
        SERVICE
    );
    let (service, _) = activate(&source, &ActivationOptions::for_stage(LOCAL_STAGE));

    let worker = &service.functions["worker"];
    assert_eq!(
        worker.environment["QUEUE_URL"].as_str(),
        Some("http://localstack:4566/000000000000/MyQueue")
    );
    assert_eq!(
        service.provider.environment["QUEUE_ARN"].as_str(),
        Some("arn:aws:sqs:eu-west-1:000000000000:MyQueue")
    );
}

#[test]
fn test_unresolved_reference_aborts_whole_activation() {
    let source = SERVICE.replace("TABLE: !Ref Orders", "TABLE: !Ref WorkerRole");
    let original = Service::from_yaml_str(&source).unwrap();
    let (service, outcome) = activate(&source, &ActivationOptions::for_stage(LOCAL_STAGE));

    assert_eq!(
        outcome.unwrap_err().to_string(),
        "unresolved reference: Ref 'WorkerRole' has no local value"
    );
    assert_eq!(service, original);
}

#[test]
fn test_pre_flight_diagnostics() {
    let source = SERVICE
        .replace("TABLE: !Ref Orders", "TABLE: !Ref WorkerRole")
        .replace("BUCKET: !Ref Uploads", "BUCKET: !GetAtt Uploads.Arn");
    let service = Service::from_yaml_str(&source).unwrap();
    let index = ResolvedIndex::build(&service.resources, &LocalEndpoint::default());

    let diagnostics = check_service(&index, &service, None);
    let locations: Vec<_> = diagnostics.iter().map(|d| d.location.as_ref()).collect();
    assert_eq!(
        locations,
        vec![
            "functions.worker.environment.TABLE",
            "functions.api.environment.BUCKET",
        ]
    );

    let warnings = index_warnings(&service.resources);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].code.as_deref(), Some(codes::UNSUPPORTED_RESOURCE));
}
