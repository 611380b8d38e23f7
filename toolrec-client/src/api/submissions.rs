//! Tool submissions from users

use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;
use crate::types::{NewSubmission, PageResult, Submission};

/// `POST /submissions`; returns the submission id.
pub async fn submit_tool(client: &ApiClient, submission: &NewSubmission) -> Result<i64> {
    client.post("/submissions", submission).await
}

pub async fn my_submissions(
    client: &ApiClient,
    current: u64,
    size: u64,
) -> Result<PageResult<Submission>> {
    let options = RequestOptions::new()
        .query("current", current)
        .query("size", size);
    client.get_with("/submissions/my", options).await
}

pub async fn submission_detail(client: &ApiClient, id: i64) -> Result<Submission> {
    client.get(&format!("/submissions/{}", id)).await
}
