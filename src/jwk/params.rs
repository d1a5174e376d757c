// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;

use crate::jwk::JwkType;

/// RSA public (and, with `d` present, private) key parameters, RFC 7518 §6.3.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkParamsRsa {
  pub n: String,
  pub e: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub p: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dp: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dq: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub qi: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub oth: Option<Vec<JwkParamsRsaPrime>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkParamsRsaPrime {
  pub r: String,
  pub d: String,
  pub t: String,
}

impl JwkParamsRsa {
  pub const fn is_public(&self) -> bool {
    self.d.is_none()
  }
}

/// EC public (and, with `d` present, private) key parameters, RFC 7518 §6.2.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkParamsEc {
  pub crv: String,
  pub x: String,
  pub y: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
}

impl JwkParamsEc {
  pub const fn is_public(&self) -> bool {
    self.d.is_none()
  }
}

/// OKP public (and, with `d` present, private) key parameters, RFC 8037 §2.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkParamsOkp {
  pub crv: String,
  pub x: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
}

impl JwkParamsOkp {
  pub const fn is_public(&self) -> bool {
    self.d.is_none()
  }
}

/// Symmetric key parameters, RFC 7518 §6.4.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkParamsOct {
  pub k: String,
}

/// The variant-specific mandatory fields of a [`crate::jwk::Jwk`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JwkParams {
  Rsa(JwkParamsRsa),
  Ec(JwkParamsEc),
  Okp(JwkParamsOkp),
  Oct(JwkParamsOct),
}

impl JwkParams {
  pub fn kty(&self) -> JwkType {
    match self {
      Self::Rsa(_) => JwkType::Rsa,
      Self::Ec(_) => JwkType::Ec,
      Self::Okp(_) => JwkType::Okp,
      Self::Oct(_) => JwkType::Oct,
    }
  }

  pub const fn is_public(&self) -> bool {
    match self {
      Self::Rsa(params) => params.is_public(),
      Self::Ec(params) => params.is_public(),
      Self::Okp(params) => params.is_public(),
      Self::Oct(_) => false,
    }
  }

  /// Drops the private components, retaining only what is safe to publish.
  pub fn to_public(&self) -> Option<Self> {
    match self {
      Self::Rsa(params) => Some(Self::Rsa(JwkParamsRsa {
        n: params.n.clone(),
        e: params.e.clone(),
        ..Default::default()
      })),
      Self::Ec(params) => Some(Self::Ec(JwkParamsEc {
        crv: params.crv.clone(),
        x: params.x.clone(),
        y: params.y.clone(),
        d: None,
      })),
      Self::Okp(params) => Some(Self::Okp(JwkParamsOkp {
        crv: params.crv.clone(),
        x: params.x.clone(),
        d: None,
      })),
      Self::Oct(_) => None,
    }
  }
}
