#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json, Object };

use crate::utils::roster::{Friend, RosterStore};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct ListFriendsApi {
    store: RosterStore,
}

impl ListFriendsApi {
    pub fn new(store: RosterStore) -> Self {
        Self {store}
    }
}

#[derive(Object, Debug)]
struct RespListFriend
{
    name: String,
    handle: String,
    skill: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl ListFriendsApi {
    #[oai(path = "/api/friends", method = "get")]
    async fn list_friends(&self) -> Json<Vec<RespListFriend>> {
        Json(RespListFriend::process(&self.store))
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespListFriend {
    /// Create a new response record.
    fn from_friend(friend: Friend) -> Self {
        Self {name: friend.name, handle: friend.handle, skill: friend.skill}
    }

    /// Process the request.  The response body is the bare array of roster
    /// records in store order, with no envelope around it.
    fn process(store: &RosterStore) -> Vec<RespListFriend> {
        store.list_all().into_iter().map(RespListFriend::from_friend).collect()
    }
}
