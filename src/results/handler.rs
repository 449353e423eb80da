use super::tuple::BindingTuple;
use super::xml::TupleStream;
use crate::error::SparqlResult;
use futures::StreamExt;

/// Push-style consumer of a tuple result
pub trait QueryResultHandler {
    /// Called once, before the first solution
    fn start_query_result(&mut self, header: &[String]);

    fn handle_solution(&mut self, tuple: BindingTuple);

    /// Called once the stream is exhausted or has failed
    fn end_query_result(&mut self);
}

/// Drive `handler` with every tuple of `tuples`
///
/// `start_query_result` sees the header of the first tuple, so an empty
/// result only produces the `end_query_result` call.
pub async fn handle_with<H>(mut tuples: TupleStream, handler: &mut H) -> SparqlResult<()>
where
    H: QueryResultHandler + ?Sized,
{
    let outcome = forward(&mut tuples, handler).await;
    handler.end_query_result();
    outcome
}

async fn forward<H>(tuples: &mut TupleStream, handler: &mut H) -> SparqlResult<()>
where
    H: QueryResultHandler + ?Sized,
{
    let mut started = false;
    while let Some(tuple) = tuples.next().await {
        let tuple = tuple?;
        if !started {
            handler.start_query_result(tuple.header());
            started = true;
        }
        handler.handle_solution(tuple);
    }
    Ok(())
}
