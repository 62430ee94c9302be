use fraudlens_lambda::{PgConnectionSource, ProxyRequest, ProxyResponse, QueryDataHandler};
use fraudlens_query::QueryRouter;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    fraudlens_lambda::init_tracing();

    let config = fraudlens_lambda::load_config()?;
    let handler = QueryDataHandler::new(
        QueryRouter::new(config.router.clone()),
        PgConnectionSource::new(config.upstream.clone()),
    );
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<ProxyRequest>| async move {
        let (request, context) = event.into_parts();
        let response = handler.handle(&request).await;
        tracing::info!(
            request_id = %context.request_id,
            status = response.status_code,
            "Request handled"
        );
        Ok::<ProxyResponse, Error>(response)
    }))
    .await
}
