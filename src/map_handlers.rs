use actix_web::{get, web, HttpResponse};

use crate::error::ApiError;
use crate::locations::LocationCatalog;
use crate::models::{Coordinates, PropertyDetails, PropertyQuery};

#[get("/alldatacenters")]
pub async fn all_datacenters(
    catalog: web::Data<LocationCatalog>,
) -> Result<HttpResponse, ApiError> {
    let datacenters = catalog.list_all()?;
    Ok(HttpResponse::Ok().json(datacenters))
}

/// Candidate sites for the discovery view, coordinates only.
#[get("/api/possible-datacenters")]
pub async fn possible_datacenters(
    catalog: web::Data<LocationCatalog>,
) -> Result<HttpResponse, ApiError> {
    let coords: Vec<Coordinates> = catalog
        .list_candidates()?
        .into_iter()
        .map(|loc| Coordinates {
            latitude: loc.latitude,
            longitude: loc.longitude,
        })
        .collect();
    Ok(HttpResponse::Ok().json(coords))
}

/// Full details for one candidate site, looked up by coordinates.
#[get("/api/property-details")]
pub async fn property_details(
    query: web::Query<PropertyQuery>,
    catalog: web::Data<LocationCatalog>,
) -> Result<HttpResponse, ApiError> {
    let (Some(lat), Some(lng)) = (query.lat.as_deref(), query.lng.as_deref()) else {
        return Err(ApiError::Validation(
            "Missing latitude or longitude parameters".to_string(),
        ));
    };
    let lat: f64 = lat
        .parse()
        .map_err(|_| ApiError::Validation("Invalid latitude format".to_string()))?;
    let lng: f64 = lng
        .parse()
        .map_err(|_| ApiError::Validation("Invalid longitude format".to_string()))?;

    let loc = catalog.find_by_coordinates(lat, lng)?;
    Ok(HttpResponse::Ok().json(PropertyDetails {
        location_name: loc.name,
        land_price: loc.land_price,
        electricity: loc.electricity,
        notes: loc.notes,
    }))
}
