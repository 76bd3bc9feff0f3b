//! Wire shapes exchanged with the links endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{
    LinkCollection, LinkHandle, LinkSubmission, Platform, StoredLink, StoredLinkId, UserId,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveLinksBody<'a> {
    pub expected_revision: u32,
    pub links: Vec<LinkBody<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkBody<'a> {
    pub id: i64,
    pub website: &'a str,
    pub username: &'a str,
    pub position: u32,
}

impl<'a> From<&'a LinkSubmission> for SaveLinksBody<'a> {
    fn from(value: &'a LinkSubmission) -> Self {
        Self {
            expected_revision: value.expected_revision,
            links: value
                .links
                .iter()
                .zip(1_u32..)
                .map(|(link, position)| LinkBody {
                    id: link.id.to_wire(),
                    website: link.platform.as_str(),
                    username: link.handle.as_ref(),
                    position,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionBody {
    pub owner_id: UserId,
    pub revision: u32,
    pub links: Vec<StoredLinkBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoredLinkBody {
    pub id: i64,
    pub website: Platform,
    pub username: LinkHandle,
    pub position: u32,
}

impl TryFrom<CollectionBody> for LinkCollection {
    type Error = String;

    fn try_from(value: CollectionBody) -> Result<Self, Self::Error> {
        let CollectionBody {
            owner_id,
            revision,
            links,
        } = value;
        let links = links
            .into_iter()
            .map(|link| {
                Ok(StoredLink {
                    id: StoredLinkId::new(link.id).map_err(|err| err.to_string())?,
                    owner_id: owner_id.clone(),
                    platform: link.website,
                    handle: link.username,
                    position: link.position,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;
        Ok(Self {
            owner_id,
            revision,
            links,
        })
    }
}
