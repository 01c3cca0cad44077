//! Browser-side scripts appended after the payload.
//!
//! `LOADER_JS` publishes `window.schoolTransitMap = { map, groups }` where
//! `groups[id].entries` pairs each Leaflet shape with its payload item. The
//! other snippets only read from that registry.

pub(super) const LOADER_JS: &str = r#"
(function () {
  var payload = JSON.parse(document.getElementById('map-data').textContent);
  var container = document.getElementById('map');
  var map = L.map(container, { preferCanvas: true });
  L.tileLayer(payload.tiles.url, {
    attribution: payload.tiles.attribution,
    maxZoom: 19
  }).addTo(map);
  map.fitBounds(payload.bounds);

  function buildShape(item) {
    var geometry = item.geometry;
    var style = Object.assign({}, item.style);
    switch (geometry.type) {
      case 'circle_marker':
        style.radius = geometry.radius;
        return L.circleMarker(geometry.center, style);
      case 'polygon':
        return L.polygon(geometry.polygons, style);
      case 'polyline':
        return L.polyline(geometry.path, style);
      default:
        return null;
    }
  }

  var groups = {};
  var overlays = {};
  payload.groups.forEach(function (group) {
    var layer = L.featureGroup();
    var entries = [];
    group.items.forEach(function (item) {
      var shape = buildShape(item);
      if (!shape) {
        return;
      }
      if (item.popup) {
        shape.bindPopup(item.popup);
      }
      if (item.tooltip) {
        shape.bindTooltip(item.tooltip, { sticky: true });
      }
      if (!item.hidden) {
        layer.addLayer(shape);
      }
      entries.push({ shape: shape, item: item });
    });
    groups[group.id] = { layer: layer, entries: entries };
    if (group.visible) {
      layer.addTo(map);
    }
    overlays[group.name] = layer;
  });
  L.control.layers(null, overlays, { collapsed: false }).addTo(map);

  var title = L.control({ position: 'topleft' });
  title.onAdd = function () {
    var div = L.DomUtil.create('div', 'map-title');
    div.textContent = container.getAttribute('data-title');
    return div;
  };
  title.addTo(map);

  window.schoolTransitMap = { map: map, groups: groups };
})();
"#;

pub(super) const TOGGLE_JS: &str = r#"
(function () {
  var app = window.schoolTransitMap;
  if (!app) {
    return;
  }
  var HIGHLIGHT = '#ff6f00';

  function group(id) {
    return app.groups[id] || { layer: null, entries: [] };
  }

  function byKey(entries, keysOf) {
    var index = {};
    entries.forEach(function (entry) {
      keysOf(entry.item).forEach(function (key) {
        (index[key] = index[key] || []).push(entry);
      });
    });
    return index;
  }

  // Schools toggle their zone polygons.
  var zones = group('school_zones');
  var zonesBySchool = byKey(zones.entries, function (item) {
    return item.toggle_key ? [item.toggle_key] : [];
  });
  group('schools').entries.forEach(function (entry) {
    var key = entry.item.toggle_key;
    if (!key || !zonesBySchool[key] || !zones.layer) {
      return;
    }
    entry.shape.on('click', function () {
      var targets = zonesBySchool[key];
      var showing = zones.layer.hasLayer(targets[0].shape);
      targets.forEach(function (target) {
        if (showing) {
          zones.layer.removeLayer(target.shape);
        } else {
          zones.layer.addLayer(target.shape);
        }
      });
      if (!showing && !app.map.hasLayer(zones.layer)) {
        zones.layer.addTo(app.map);
      }
    });
  });

  // Routes toggle a highlight on themselves and the stops they serve.
  var routes = group('transit_routes');
  var stops = group('transit_stops');
  var shapesByRoute = byKey(routes.entries, function (item) {
    return item.toggle_key ? [item.toggle_key] : [];
  });
  var stopsByRoute = byKey(stops.entries, function (item) {
    return item.links || [];
  });
  var highlighted = {};

  function paintStop(entry) {
    var on = (entry.item.links || []).some(function (id) {
      return highlighted[id];
    });
    var base = entry.item.style;
    entry.shape.setStyle(on ? { color: HIGHLIGHT, fillColor: HIGHLIGHT } : base);
    entry.shape.setRadius(on ? entry.item.geometry.radius * 1.8 : entry.item.geometry.radius);
  }

  function paintRoute(routeId) {
    var on = !!highlighted[routeId];
    (shapesByRoute[routeId] || []).forEach(function (entry) {
      var base = entry.item.style;
      entry.shape.setStyle(on ? { weight: base.weight * 2, opacity: 1 } : base);
      if (on) {
        entry.shape.bringToFront();
      }
    });
    (stopsByRoute[routeId] || []).forEach(paintStop);
  }

  Object.keys(shapesByRoute).forEach(function (routeId) {
    shapesByRoute[routeId].forEach(function (entry) {
      entry.shape.on('click', function () {
        highlighted[routeId] = !highlighted[routeId];
        paintRoute(routeId);
      });
    });
  });
})();
"#;

pub(super) const LEGEND_JS: &str = r#"
(function () {
  var app = window.schoolTransitMap;
  if (!app) {
    return;
  }
  var payload = JSON.parse(document.getElementById('map-data').textContent);
  var legend = L.control({ position: 'bottomright' });
  legend.onAdd = function () {
    var div = L.DomUtil.create('div', 'map-legend');
    var heading = L.DomUtil.create('b', '', div);
    heading.textContent = 'School level';
    payload.legend.forEach(function (entry) {
      var row = L.DomUtil.create('div', '', div);
      var swatch = L.DomUtil.create('i', '', row);
      swatch.style.background = entry.color;
      row.appendChild(document.createTextNode(entry.label));
    });
    return div;
  };
  legend.addTo(app.map);
})();
"#;
