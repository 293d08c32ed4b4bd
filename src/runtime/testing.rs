//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use super::ChatId;
use crate::places::{PlacesError, PlacesGateway, SearchPage, SearchRequest};
use crate::state_machine::Notice;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Mock Places Gateway
// ============================================================================

/// Mock gateway that returns queued responses
pub struct MockGateway {
    responses: Mutex<VecDeque<Result<SearchPage, PlacesError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<SearchRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful page
    pub fn queue_page(&self, page: SearchPage) {
        self.responses.lock().unwrap().push_back(Ok(page));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: PlacesError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlacesGateway for MockGateway {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, PlacesError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlacesError::network("No mock response queued")))
    }
}

/// Gateway whose searches never complete
pub struct HangingGateway;

#[async_trait]
impl PlacesGateway for HangingGateway {
    async fn search(&self, _request: &SearchRequest) -> Result<SearchPage, PlacesError> {
        std::future::pending().await
    }
}

// ============================================================================
// Recording Renderer
// ============================================================================

/// Everything a renderer can be asked to show
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Notice(Notice),
    Places {
        places: Vec<PlaceCard>,
        has_more: bool,
    },
    Directions {
        place_name: String,
        url: String,
    },
}

/// Renderer that forwards every output to a channel
pub struct RecordingRenderer {
    tx: mpsc::UnboundedSender<(ChatId, Rendered)>,
}

impl RecordingRenderer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(ChatId, Rendered)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn record(&self, chat: ChatId, rendered: Rendered) -> Result<(), String> {
        self.tx
            .send((chat, rendered))
            .map_err(|_| "recorder dropped".to_string())
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn notify(&self, chat: ChatId, notice: &Notice) -> Result<(), String> {
        self.record(chat, Rendered::Notice(notice.clone()))
    }

    async fn show_places(
        &self,
        chat: ChatId,
        places: &[PlaceCard],
        has_more: bool,
    ) -> Result<(), String> {
        self.record(
            chat,
            Rendered::Places {
                places: places.to_vec(),
                has_more,
            },
        )
    }

    async fn show_directions(
        &self,
        chat: ChatId,
        place_name: &str,
        url: &str,
    ) -> Result<(), String> {
        self.record(
            chat,
            Rendered::Directions {
                place_name: place_name.to_string(),
                url: url.to_string(),
            },
        )
    }
}

/// Wait for the next rendered output
pub async fn next_output(rx: &mut mpsc::UnboundedReceiver<(ChatId, Rendered)>) -> (ChatId, Rendered) {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for output")
        .expect("renderer channel closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Category;
    use crate::geo::Coordinates;
    use crate::places::{Place, PhotoUrlBuilder, SearchMode, SearchQuery};
    use crate::runtime::{DispatchError, SessionManager, UserId};
    use crate::state_machine::{Event, ShortId};
    use std::sync::Arc;

    const ORIGIN: Coordinates = Coordinates {
        latitude: 52.2297,
        longitude: 21.0122,
    };
    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    type Outputs = mpsc::UnboundedReceiver<(ChatId, Rendered)>;

    /// Private chats share the user's id
    fn private(user: UserId) -> ChatId {
        ChatId(user.0)
    }

    fn setup() -> (
        SessionManager<MockGateway, RecordingRenderer>,
        Arc<MockGateway>,
        Outputs,
    ) {
        let gateway = Arc::new(MockGateway::new());
        let (renderer, rx) = RecordingRenderer::new();
        let photos = PhotoUrlBuilder::new("https://photos.test", "key");
        let manager = SessionManager::new(gateway.clone(), Arc::new(renderer), photos);
        (manager, gateway, rx)
    }

    fn text(s: &str) -> Event {
        Event::Text {
            text: s.to_string(),
        }
    }

    fn place_north(id: &str, meters: f64) -> Place {
        let dlat = (meters / 1000.0 / crate::geo::EARTH_RADIUS_KM).to_degrees();
        Place {
            id: Some(id.to_string()),
            name: Some(format!("Place {id}")),
            address: Some("Main St 1".to_string()),
            rating: Some(4.2),
            rating_count: 7,
            location: Some(Coordinates::new(ORIGIN.latitude + dlat, ORIGIN.longitude)),
            photo_name: Some(format!("places/{id}/photos/p1")),
            ..Place::default()
        }
    }

    async fn expect_notice(rx: &mut Outputs, user: UserId) -> Notice {
        match next_output(rx).await {
            (chat, Rendered::Notice(notice)) if chat == private(user) => notice,
            other => panic!("expected notice for {user}, got {other:?}"),
        }
    }

    async fn expect_places(rx: &mut Outputs, user: UserId) -> (Vec<PlaceCard>, bool) {
        match next_output(rx).await {
            (chat, Rendered::Places { places, has_more }) if chat == private(user) => {
                (places, has_more)
            }
            other => panic!("expected places for {user}, got {other:?}"),
        }
    }

    /// Share a location, set the radius and pick restaurants
    async fn search_restaurants(
        manager: &SessionManager<MockGateway, RecordingRenderer>,
        rx: &mut Outputs,
        user: UserId,
    ) -> (Vec<PlaceCard>, bool) {
        manager
            .dispatch(user, private(user), Event::LocationShared { location: ORIGIN })
            .await
            .unwrap();
        manager.dispatch(user, private(user), text("2000m")).await.unwrap();
        manager.dispatch(user, private(user), text("🍽 Restaurants")).await.unwrap();

        assert_eq!(
            expect_notice(rx, user).await,
            Notice::LocationReceived { location: ORIGIN }
        );
        assert_eq!(
            expect_notice(rx, user).await,
            Notice::RadiusSet { radius_m: 2000.0 }
        );
        assert_eq!(
            expect_notice(rx, user).await,
            Notice::Searching {
                query: SearchQuery::Category(Category::Restaurant)
            }
        );
        expect_places(rx, user).await
    }

    #[tokio::test]
    async fn test_mock_gateway_defaults_to_error() {
        let gateway = MockGateway::new();
        let request = SearchRequest::first_page(
            ORIGIN,
            500.0,
            SearchQuery::Category(Category::Cafe),
        );
        assert!(gateway.search(&request).await.is_err());
        assert_eq!(gateway.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_category_search_end_to_end() {
        let (manager, gateway, mut rx) = setup();
        gateway.queue_page(SearchPage {
            places: vec![place_north("near", 150.5), place_north("far", 8000.0)],
            next_page_token: Some("page-2".to_string()),
        });

        let (cards, has_more) = search_restaurants(&manager, &mut rx, ALICE).await;
        assert!(has_more);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Place near");
        assert_eq!(cards[0].distance_text, "150 m");
        assert_eq!(
            cards[0].photo_url.as_deref(),
            Some("https://photos.test/v1/places/near/photos/p1/media?key=key&maxWidthPx=800&maxHeightPx=600")
        );
        assert!(cards[0].directions_id.is_some());

        let requests = gateway.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].mode(), SearchMode::CategorySearch);
        assert_eq!(requests[0].query.param(), "restaurant");
        assert!((requests[0].radius_m - 2000.0).abs() < f64::EPSILON);
        assert_eq!(requests[0].origin, ORIGIN);
    }

    #[tokio::test]
    async fn test_custom_query_end_to_end() {
        let (manager, gateway, mut rx) = setup();
        gateway.queue_page(SearchPage {
            places: vec![place_north("sushi", 300.0)],
            next_page_token: None,
        });

        manager
            .dispatch(ALICE, private(ALICE), Event::LocationShared { location: ORIGIN })
            .await
            .unwrap();
        manager.dispatch(ALICE, private(ALICE), text("1000")).await.unwrap();
        manager
            .dispatch(ALICE, private(ALICE), text(crate::facility::CUSTOM_QUERY_LABEL))
            .await
            .unwrap();
        manager.dispatch(ALICE, private(ALICE), text("sushi restaurant")).await.unwrap();

        expect_notice(&mut rx, ALICE).await;
        expect_notice(&mut rx, ALICE).await;
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::CustomQueryPrompt);
        assert_eq!(
            expect_notice(&mut rx, ALICE).await,
            Notice::Searching {
                query: SearchQuery::FreeText("sushi restaurant".to_string())
            }
        );
        let (cards, has_more) = expect_places(&mut rx, ALICE).await;
        assert_eq!(cards.len(), 1);
        assert!(!has_more);

        let requests = gateway.recorded_requests();
        assert_eq!(requests[0].mode(), SearchMode::FreeTextSearch);
        assert_eq!(requests[0].query.param(), "sushi restaurant");
    }

    #[tokio::test]
    async fn test_pagination_and_failure_keeps_token() {
        let (manager, gateway, mut rx) = setup();
        gateway.queue_page(SearchPage {
            places: vec![place_north("a", 100.0)],
            next_page_token: Some("t1".to_string()),
        });
        search_restaurants(&manager, &mut rx, ALICE).await;

        // Second page fails; the token must survive for a retry
        gateway.queue_error(PlacesError::upstream_http(503, "unavailable"));
        manager.dispatch(ALICE, private(ALICE), Event::MoreResults).await.unwrap();
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::FetchingMore);
        assert_eq!(
            expect_notice(&mut rx, ALICE).await,
            Notice::UpstreamError {
                status: 503,
                body: "unavailable".to_string()
            }
        );

        gateway.queue_page(SearchPage {
            places: vec![place_north("b", 200.0)],
            next_page_token: None,
        });
        manager.dispatch(ALICE, private(ALICE), Event::MoreResults).await.unwrap();
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::FetchingMore);
        let (cards, has_more) = expect_places(&mut rx, ALICE).await;
        assert_eq!(cards[0].name, "Place b");
        assert!(!has_more);

        let requests = gateway.recorded_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].page_token.as_deref(), Some("t1"));
        assert_eq!(requests[2].page_token.as_deref(), Some("t1"));
        assert_eq!(requests[2].query, requests[0].query);

        // Last page reached
        manager.dispatch(ALICE, private(ALICE), Event::MoreResults).await.unwrap();
        assert_eq!(
            expect_notice(&mut rx, ALICE).await,
            Notice::MissingSearchContext
        );
        assert_eq!(gateway.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_more_results_without_search_issues_no_request() {
        let (manager, gateway, mut rx) = setup();
        manager.dispatch(ALICE, private(ALICE), Event::MoreResults).await.unwrap();
        assert_eq!(
            expect_notice(&mut rx, ALICE).await,
            Notice::MissingSearchContext
        );
        assert!(gateway.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_directions_are_per_user() {
        let (manager, gateway, mut rx) = setup();
        gateway.queue_page(SearchPage {
            places: vec![place_north("dest", 400.0)],
            next_page_token: None,
        });
        let (cards, _) = search_restaurants(&manager, &mut rx, ALICE).await;
        let id = cards[0].directions_id.clone().unwrap();

        manager
            .dispatch(BOB, private(BOB), Event::LocationShared { location: ORIGIN })
            .await
            .unwrap();
        expect_notice(&mut rx, BOB).await;
        manager
            .dispatch(BOB, private(BOB), Event::Directions { short_id: id.clone() })
            .await
            .unwrap();
        assert_eq!(expect_notice(&mut rx, BOB).await, Notice::MissingPlaceRef);

        manager
            .dispatch(ALICE, private(ALICE), Event::Directions { short_id: id })
            .await
            .unwrap();
        match next_output(&mut rx).await {
            (chat, Rendered::Directions { place_name, url }) if chat == private(ALICE) => {
                assert_eq!(place_name, "Place dest");
                assert!(url.contains("destination_place_id=dest"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(manager.active_sessions().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_directions_id_leaves_session() {
        let (manager, gateway, mut rx) = setup();
        gateway.queue_page(SearchPage {
            places: vec![place_north("a", 50.0)],
            next_page_token: Some("t".to_string()),
        });
        search_restaurants(&manager, &mut rx, ALICE).await;

        manager
            .dispatch(
                ALICE,
                private(ALICE),
                Event::Directions {
                    short_id: ShortId::from("deadbeef"),
                },
            )
            .await
            .unwrap();
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::MissingPlaceRef);

        // Still in results: pagination continues with the same token
        gateway.queue_page(SearchPage::default());
        manager.dispatch(ALICE, private(ALICE), Event::MoreResults).await.unwrap();
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::FetchingMore);
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::NoMoreResults);
        assert_eq!(
            gateway.recorded_requests()[1].page_token.as_deref(),
            Some("t")
        );
    }

    #[tokio::test]
    async fn test_stop_back_resets() {
        let (manager, _gateway, mut rx) = setup();
        manager
            .dispatch(ALICE, private(ALICE), Event::LocationShared { location: ORIGIN })
            .await
            .unwrap();
        expect_notice(&mut rx, ALICE).await;

        manager
            .dispatch(
                ALICE,
                private(ALICE),
                Event::from_text(crate::state_machine::event::STOP_BACK_LABEL),
            )
            .await
            .unwrap();
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::Stopped);

        // Back in Idle: radius text is not understood any more
        manager.dispatch(ALICE, private(ALICE), text("500")).await.unwrap();
        assert_eq!(expect_notice(&mut rx, ALICE).await, Notice::NotUnderstood);
    }

    #[tokio::test]
    async fn test_full_queue_does_not_block_other_users() {
        let (renderer, mut rx) = RecordingRenderer::new();
        let photos = PhotoUrlBuilder::new("https://photos.test", "key");
        let manager = SessionManager::new(Arc::new(HangingGateway), Arc::new(renderer), photos);

        // Alice's runtime gets stuck in a search that never returns
        for event in [
            Event::LocationShared { location: ORIGIN },
            text("2000m"),
            text("🍽 Restaurants"),
        ] {
            manager.dispatch(ALICE, private(ALICE), event).await.unwrap();
        }

        let mut busy = 0;
        for _ in 0..40 {
            let sent = tokio::time::timeout(
                Duration::from_secs(1),
                manager.dispatch(ALICE, private(ALICE), Event::MoreResults),
            )
            .await
            .expect("dispatch waited on a stuck session");
            if sent == Err(DispatchError::Busy(ALICE)) {
                busy += 1;
            }
        }
        assert!(busy > 0);

        tokio::time::timeout(
            Duration::from_secs(1),
            manager.dispatch(BOB, private(BOB), Event::LocationShared { location: ORIGIN }),
        )
        .await
        .expect("dispatch for another user was blocked")
        .unwrap();

        loop {
            match next_output(&mut rx).await {
                (chat, Rendered::Notice(notice)) if chat == private(BOB) => {
                    assert_eq!(notice, Notice::LocationReceived { location: ORIGIN });
                    break;
                }
                (chat, _) => assert_eq!(chat, private(ALICE)),
            }
        }
    }

    #[tokio::test]
    async fn test_replies_go_to_the_originating_chat() {
        let (manager, _gateway, mut rx) = setup();
        let group = ChatId(-1001);

        manager
            .dispatch(ALICE, group, Event::LocationShared { location: ORIGIN })
            .await
            .unwrap();
        assert_eq!(
            next_output(&mut rx).await,
            (
                group,
                Rendered::Notice(Notice::LocationReceived { location: ORIGIN })
            )
        );

        // Same session, now answered in the private chat
        manager.dispatch(ALICE, private(ALICE), text("500")).await.unwrap();
        assert_eq!(
            expect_notice(&mut rx, ALICE).await,
            Notice::RadiusSet { radius_m: 500.0 }
        );
        assert_eq!(manager.active_sessions().await, 1);
    }
}
