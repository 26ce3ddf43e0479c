use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::decision::domain::{ChoiceId, CriterionId, Score};
use crate::decision::model::DecisionModel;
use crate::decision::router::decision_router;
use crate::decision::service::DecisionService;

pub(super) const PUBLIC_URL: &str = "https://decide.example.com/";

pub(super) fn score(value: f64) -> Score {
    Score::new(value).expect("valid score")
}

/// Price(2) and Quality(3); A scores 8/6, B scores 5/9.
pub(super) struct PriceQuality {
    pub(super) model: DecisionModel,
    pub(super) price: CriterionId,
    pub(super) quality: CriterionId,
    pub(super) a: ChoiceId,
    pub(super) b: ChoiceId,
}

pub(super) fn price_quality() -> PriceQuality {
    let mut model = DecisionModel::new();
    let price = model.add_criterion("Price", 2.0);
    let quality = model.add_criterion("Quality", 3.0);
    let a = model.add_choice("A");
    let b = model.add_choice("B");
    model.set_score(a, price, Some(score(8.0)));
    model.set_score(a, quality, Some(score(6.0)));
    model.set_score(b, price, Some(score(5.0)));
    model.set_score(b, quality, Some(score(9.0)));

    PriceQuality {
        model,
        price,
        quality,
        a,
        b,
    }
}

pub(super) fn service() -> DecisionService {
    DecisionService::new(PUBLIC_URL)
}

pub(super) fn router() -> axum::Router {
    decision_router(Arc::new(service()))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
